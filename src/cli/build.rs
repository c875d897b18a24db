//! Function for building the command line hierarchy.

use super::{
    inspect::create_inspect_subcommand, sample::create_sample_subcommand,
    trace::create_trace_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `fieldbend` command line hierarchy.
pub fn build() -> Command<'static> {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Print status messages"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .help("Print detailed diagnostic messages (implies `verbose`)"),
        )
        .subcommand(create_sample_subcommand())
        .subcommand(create_trace_subcommand())
        .subcommand(create_inspect_subcommand())
}
