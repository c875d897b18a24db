//! Command line interface for the lattice stepper.

use super::utils;
use crate::{
    exit_on_false,
    tracing::stepping::cone::{ConeStepperConfig, TieBreak},
};
use clap::{Arg, ArgMatches, Command};

/// Adds arguments for parameters used by the cone stepper.
pub fn add_cone_stepper_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("max-angle")
                .long("max-angle")
                .require_equals(true)
                .value_name("DEGREES")
                .help(
                    "Neighbors deviating this much or more from the field direction\n\
                     are not stepped to",
                )
                .next_line_help(true)
                .takes_value(true)
                .default_value("30"),
        )
        .arg(
            Arg::new("tie-break")
                .long("tie-break")
                .require_equals(true)
                .value_name("RULE")
                .help("Which of several equally aligned neighbors to step to")
                .next_line_help(true)
                .takes_value(true)
                .possible_values(&["first", "last"])
                .default_value("last"),
        )
}

/// Sets cone stepper parameters based on present arguments.
pub fn construct_cone_stepper_config_from_arguments(arguments: &ArgMatches) -> ConeStepperConfig {
    let mut config = ConeStepperConfig::default();
    utils::assign_value_from_parseable_argument(
        &mut config.max_angle_degrees,
        arguments,
        "max-angle",
    );
    utils::assign_value_from_parseable_argument::<TieBreak>(
        &mut config.tie_break,
        arguments,
        "tie-break",
    );
    exit_on_false!(
        config.max_angle_degrees > 0.0 && config.max_angle_degrees <= 180.0,
        "Error: max-angle must be in the range (0, 180]"
    );
    config
}
