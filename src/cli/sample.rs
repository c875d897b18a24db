//! Command line interface for sampling field line curvature.

use super::{
    stepping::{add_cone_stepper_arguments_to_subcommand, construct_cone_stepper_config_from_arguments},
    utils,
};
use crate::{
    exit_on_error, exit_on_false,
    grid::{fgr, FieldGrid},
    io::{samples, Verbosity},
    random,
    sampling::{CurvatureSample, CurvatureSampler, CurvatureSamplerConfig},
    tracing::stepping::cone::ConeStepper3,
};
use clap::{Arg, ArgMatches, Command};
use rand::Rng;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Builds a representation of the `sample` command line subcommand.
pub fn create_sample_subcommand() -> Command<'static> {
    let command = Command::new("sample")
        .about("Sample field line curvature against end point displacement")
        .long_about(
            "Sample field line curvature against end point displacement.\n\
             Each trial traces the field from a random lattice cell for a random number\n\
             of steps and records the distance between the end points together with the\n\
             average of the curvatures estimated at the two ends.",
        )
        .arg(utils::create_input_file_argument())
        .arg(
            Arg::new("n-trials")
                .short('n')
                .long("n-trials")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of samples to produce")
                .takes_value(true)
                .default_value("100000"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random number generator [default: random]")
                .takes_value(true),
        )
        .arg(
            Arg::new("max-attempts")
                .long("max-attempts")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of start points to try for a single trial before giving up")
                .next_line_help(true)
                .takes_value(true)
                .default_value("10000"),
        )
        .arg(
            Arg::new("min-trace-length")
                .long("min-trace-length")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Smallest number of steps to trace in a trial (at least 2)")
                .takes_value(true)
                .default_value("2"),
        )
        .arg(
            Arg::new("output-file")
                .short('o')
                .long("output-file")
                .require_equals(true)
                .value_name("OUTPUT_FILE")
                .help(
                    "Path of the file to write the samples to [default: standard output]\n\
                     Samples are written as JSON if the extension is .json",
                )
                .next_line_help(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar for sampling"),
        );
    add_cone_stepper_arguments_to_subcommand(command)
}

/// Runs the actions for the `sample` subcommand using the given arguments.
pub fn run_sample_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments);

    let grid = utils::read_grid_from_arguments(arguments, verbosity);

    let stepper = ConeStepper3::new(construct_cone_stepper_config_from_arguments(arguments));
    let sampler = CurvatureSampler::new(construct_sampler_config_from_arguments(arguments), stepper);

    let seed = utils::get_value_from_parseable_argument(arguments, "seed")
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
    if verbosity.print_debug_messages() {
        eprintln!("Using random seed {}", seed);
    }
    let mut rng = random::create_rng(seed);

    let output_file_path = arguments.value_of("output-file").map(PathBuf::from);
    let show_progress = arguments.is_present("progress");

    match output_file_path.as_deref() {
        Some(path) if has_json_extension(path) => {
            write_samples_to_json_file(&sampler, &grid, &mut rng, path, show_progress, verbosity)
        }
        Some(path) => {
            let file = exit_on_error!(
                fs::File::create(path),
                "Error: Could not create output file {}: {}",
                path.display()
            );
            stream_samples_as_text(
                &sampler,
                &grid,
                &mut rng,
                io::BufWriter::new(file),
                show_progress,
                verbosity,
            );
        }
        None => stream_samples_as_text(
            &sampler,
            &grid,
            &mut rng,
            io::BufWriter::new(io::stdout()),
            show_progress,
            verbosity,
        ),
    }
}

fn construct_sampler_config_from_arguments(arguments: &ArgMatches) -> CurvatureSamplerConfig {
    let config = CurvatureSamplerConfig {
        n_trials: utils::get_value_from_required_parseable_argument(arguments, "n-trials"),
        max_attempts_per_trial: utils::get_value_from_required_parseable_argument(
            arguments,
            "max-attempts",
        ),
        trace_length_offset: utils::get_value_from_required_parseable_argument(
            arguments,
            "min-trace-length",
        ),
    };
    exit_on_false!(
        config.max_attempts_per_trial > 0,
        "Error: max-attempts must be larger than zero"
    );
    exit_on_false!(
        config.trace_length_offset >= CurvatureSamplerConfig::MIN_TRACE_LENGTH_OFFSET,
        "Error: min-trace-length must be at least {}",
        CurvatureSamplerConfig::MIN_TRACE_LENGTH_OFFSET
    );
    config
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("json"))
}

fn run_sampler<H>(
    sampler: &CurvatureSampler<ConeStepper3>,
    grid: &FieldGrid<fgr>,
    rng: &mut impl Rng,
    show_progress: bool,
    verbosity: Verbosity,
    mut handle_sample: H,
) where
    H: FnMut(CurvatureSample<fgr>),
{
    let n_trials = sampler.config().n_trials;
    if verbosity.print_messages() {
        eprintln!("Sampling {} field lines", n_trials);
    }
    let progress_bar = utils::create_progress_bar(n_trials, show_progress);

    let stats = exit_on_error!(
        sampler.run(grid, rng, |sample| {
            handle_sample(sample);
            progress_bar.inc(1);
        }),
        "Error: Sampling failed: {}"
    );
    progress_bar.finish_and_clear();

    if verbosity.print_messages() {
        eprintln!(
            "Completed {} trials ({} start points discarded)",
            stats.completed_trials, stats.discarded_attempts
        );
    }
}

fn stream_samples_as_text<W: Write>(
    sampler: &CurvatureSampler<ConeStepper3>,
    grid: &FieldGrid<fgr>,
    rng: &mut impl Rng,
    mut writer: W,
    show_progress: bool,
    verbosity: Verbosity,
) {
    run_sampler(sampler, grid, rng, show_progress, verbosity, |sample| {
        exit_on_error!(
            samples::write_sample_as_text(&mut writer, &sample),
            "Error: Could not write sample: {}"
        );
    });
    exit_on_error!(writer.flush(), "Error: Could not write samples: {}");
}

#[cfg(feature = "json")]
fn write_samples_to_json_file(
    sampler: &CurvatureSampler<ConeStepper3>,
    grid: &FieldGrid<fgr>,
    rng: &mut impl Rng,
    output_file_path: &Path,
    show_progress: bool,
    verbosity: Verbosity,
) {
    let mut collected_samples = Vec::with_capacity(sampler.config().n_trials);
    run_sampler(sampler, grid, rng, show_progress, verbosity, |sample| {
        collected_samples.push(sample)
    });
    if verbosity.print_messages() {
        eprintln!("Saving samples in {}", output_file_path.display());
    }
    exit_on_error!(
        samples::save_samples_as_json(output_file_path, &collected_samples),
        "Error: Could not save output file {}: {}",
        output_file_path.display()
    );
}

#[cfg(not(feature = "json"))]
fn write_samples_to_json_file(
    sampler: &CurvatureSampler<ConeStepper3>,
    grid: &FieldGrid<fgr>,
    rng: &mut impl Rng,
    output_file_path: &Path,
    show_progress: bool,
    verbosity: Verbosity,
) {
    eprintln!("Warning: JSON output requires the `json` feature, writing samples as text");
    let file = exit_on_error!(
        fs::File::create(output_file_path),
        "Error: Could not create output file {}: {}",
        output_file_path.display()
    );
    stream_samples_as_text(
        sampler,
        grid,
        rng,
        io::BufWriter::new(file),
        show_progress,
        verbosity,
    );
}
