#![forbid(unsafe_code)]

use dashgrid_core::logging::{self, LogFormat};

fn main() {
    let format = match std::env::var("DASHGRID_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Human,
    };
    // A second subscriber is the only failure mode; nothing to report.
    let _ = logging::init(format);

    if let Err(error) = dashgrid_harness::run_from_env() {
        eprintln!("dashgrid: {error}");
        std::process::exit(error.exit_code());
    }
}
