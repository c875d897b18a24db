//! Command line interface for tracing a single field line.

use super::{
    stepping::{add_cone_stepper_arguments_to_subcommand, construct_cone_stepper_config_from_arguments},
    utils,
};
use crate::{
    exit_on_error,
    geometry::Idx3,
    tracing::{
        curvature::CurvatureEstimator3, stepping::cone::ConeStepper3, trace_lattice_field_line,
        StoppingCause,
    },
};
use clap::{Arg, ArgMatches, Command};
use std::io::{self, Write};

/// Builds a representation of the `trace` command line subcommand.
pub fn create_trace_subcommand() -> Command<'static> {
    let command = Command::new("trace")
        .about("Trace a single field line and print the visited lattice cells")
        .arg(utils::create_input_file_argument())
        .arg(
            Arg::new("start")
                .short('s')
                .long("start")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["X", "Y", "Z"])
                .help("Lattice index of the cell to start tracing from (comma-separated)")
                .next_line_help(true)
                .takes_value(true)
                .number_of_values(3)
                .required(true),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of steps to take")
                .takes_value(true)
                .default_value("100"),
        );
    add_cone_stepper_arguments_to_subcommand(command)
}

/// Runs the actions for the `trace` subcommand using the given arguments.
pub fn run_trace_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments);

    let grid = utils::read_grid_from_arguments(arguments, verbosity);

    let start: Vec<isize> = utils::get_values_from_required_parseable_argument(arguments, "start");
    utils::verify_argument_value_count("start", &start, 3);
    let start = Idx3::new(start[0], start[1], start[2]);
    let start = exit_on_error!(
        grid.checked_at(&start).map(|_| Idx3::<usize>::from(&start)),
        "Error: Invalid start index: {}"
    );

    let max_steps: usize = utils::get_value_from_required_parseable_argument(arguments, "max-steps");

    let estimator = CurvatureEstimator3::new(ConeStepper3::new(
        construct_cone_stepper_config_from_arguments(arguments),
    ));
    let field_line = trace_lattice_field_line(estimator.stepper(), &grid, &start, max_steps);

    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());
    for indices in field_line.indices() {
        let curvature = estimator
            .curvature(&grid, indices)
            .map_or_else(|| String::from("undefined"), |curvature| curvature.to_string());
        exit_on_error!(
            writeln!(
                writer,
                "{}\t{}\t{}",
                indices,
                grid.position(indices),
                curvature
            ),
            "Error: Could not write field line: {}"
        );
    }
    exit_on_error!(writer.flush(), "Error: Could not write field line: {}");

    if verbosity.print_messages() {
        eprintln!(
            "Traced {} steps from {} to {}: {}",
            field_line.n_steps(),
            field_line.start(),
            field_line.end(),
            match field_line.stopping_cause() {
                StoppingCause::ReachedMaxSteps => "reached maximum number of steps",
                StoppingCause::NoAdmissibleNeighbor => "no admissible neighbor",
            }
        );
    }
}
