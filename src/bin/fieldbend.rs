//! Command line runner for the `fieldbend` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    fieldbend::cli::run::run();
}

#[cfg(feature = "for-testing")]
fn main() {
    eprintln!(
        "Warning: The `for-testing` feature is enabled, which turns errors into panics\n\
         Tip: Use cargo flag --features=all-non-testing to include all features except `for-testing`"
    );
    fieldbend::cli::run::run();
}
