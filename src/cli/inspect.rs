//! Command line interface for inspecting a field file.

use super::{
    stepping::{add_cone_stepper_arguments_to_subcommand, construct_cone_stepper_config_from_arguments},
    utils,
};
use crate::tracing::{curvature::CurvatureEstimator3, stepping::cone::ConeStepper3};
use clap::{ArgMatches, Command};

/// Builds a representation of the `inspect` command line subcommand.
pub fn create_inspect_subcommand() -> Command<'static> {
    let command = Command::new("inspect")
        .about("Print the layout of the field grid and how many cells have a defined curvature")
        .arg(utils::create_input_file_argument());
    add_cone_stepper_arguments_to_subcommand(command)
}

/// Runs the actions for the `inspect` subcommand using the given arguments.
pub fn run_inspect_subcommand(arguments: &ArgMatches) {
    let verbosity = utils::parse_verbosity(arguments);

    let grid = utils::read_grid_from_arguments(arguments, verbosity);

    let estimator = CurvatureEstimator3::new(ConeStepper3::new(
        construct_cone_stepper_config_from_arguments(arguments),
    ));
    let n_defined = grid
        .indices()
        .filter(|indices| estimator.curvature(&grid, indices).is_some())
        .count();

    let [v1, v2, normal] = grid.basis().basis_vectors();
    println!("Shape: {}", grid.shape());
    println!("Spacing: {}", grid.spacing());
    println!("Basis vector 1: {}", v1);
    println!("Basis vector 2: {}", v2);
    println!("Normal: {}", normal);
    println!("Center: {}", grid.center());
    println!("Cells: {}", grid.n_cells());
    println!(
        "Cells with defined curvature: {} ({:.1}%)",
        n_defined,
        100.0 * n_defined as f64 / grid.n_cells() as f64
    );
}
