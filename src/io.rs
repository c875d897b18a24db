//! File input/output.

pub mod field_file;
pub mod samples;

/// How much non-critical status information to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Messages,
    Debug,
}

impl Verbosity {
    /// Determines the verbosity from the presence of the message and debug flags.
    pub fn from_flags(messages: bool, debug: bool) -> Self {
        if debug {
            Self::Debug
        } else if messages {
            Self::Messages
        } else {
            Self::Quiet
        }
    }

    /// Whether ordinary status messages should be printed.
    pub fn print_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Whether detailed diagnostic messages should be printed.
    pub fn print_debug_messages(&self) -> bool {
        matches!(self, Self::Debug)
    }
}
