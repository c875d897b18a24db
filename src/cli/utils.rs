//! Utilities for creating the command line interface.

use crate::{
    exit_on_error, exit_on_false,
    grid::{fgr, FieldGrid},
    io::{field_file, Verbosity},
};
use clap::{Arg, ArgMatches};
use indicatif::{ProgressBar, ProgressStyle};
use lazy_static::lazy_static;
use std::{path::PathBuf, str::FromStr};

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle =
        ProgressStyle::default_bar().template("Progress: {bar:40}  {percent}% | ETA: {eta}");
}

/// Creates a progress bar with the default style, or a hidden one if not requested.
pub fn create_progress_bar(length: usize, show: bool) -> ProgressBar {
    if show {
        ProgressBar::new(length as u64).with_style(DEFAULT_PROGRESS_STYLE.clone())
    } else {
        ProgressBar::hidden()
    }
}

/// Creates the positional argument for the path to the field file.
pub fn create_input_file_argument() -> Arg<'static> {
    Arg::new("input-file")
        .value_name("INPUT_FILE")
        .help("Path to the file containing the sampled vector field")
        .required(true)
        .takes_value(true)
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn parse_value_strings<'a, 'b, T, I>(argument_name: &'a str, value_strings: I) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
    I: Iterator<Item = &'b str>,
{
    value_strings
        .filter_map(|value_string| {
            if value_string.is_empty() {
                None
            } else {
                Some(parse_value_string(argument_name, value_string))
            }
        })
        .collect()
}

pub fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_string(
        argument_name,
        arguments
            .value_of(argument_name)
            .expect("No value for required argument"),
    )
}

pub fn get_value_from_parseable_argument<T>(arguments: &ArgMatches, argument_name: &str) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

/// Overwrites the given value with the parsed argument value if the argument is present.
pub fn assign_value_from_parseable_argument<T>(
    value: &mut T,
    arguments: &ArgMatches,
    argument_name: &str,
) where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    if let Some(parsed_value) = get_value_from_parseable_argument(arguments, argument_name) {
        *value = parsed_value;
    }
}

pub fn get_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_value_strings(
        argument_name,
        arguments
            .values_of(argument_name)
            .expect("No values for required argument"),
    )
}

pub fn parse_verbosity(arguments: &ArgMatches) -> Verbosity {
    Verbosity::from_flags(arguments.is_present("verbose"), arguments.is_present("debug"))
}

/// Reads the field grid from the file given by the `input-file` argument,
/// exiting with an error message if this fails.
pub fn read_grid_from_arguments(arguments: &ArgMatches, verbosity: Verbosity) -> FieldGrid<fgr> {
    let input_file_path = PathBuf::from(
        arguments
            .value_of("input-file")
            .expect("No value for required argument"),
    );
    exit_on_error!(
        field_file::read_field_grid(&input_file_path, verbosity),
        "Error: Could not read field file {}: {}",
        input_file_path.display()
    )
}
