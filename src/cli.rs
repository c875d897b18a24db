//! Command line interface.

pub mod build;
pub mod inspect;
pub mod run;
pub mod sample;
pub mod stepping;
pub mod trace;
pub mod utils;
