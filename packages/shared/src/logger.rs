//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` applies to the
/// binary's crate (named after `bin_name`) and dependencies log warnings
/// only. Output goes to stderr.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let default_filter = format!("warn,{crate_name}={default_level},chatroom_shared={default_level}");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // a second call keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
