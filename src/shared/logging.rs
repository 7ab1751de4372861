use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use super::env_var::EnvVars;

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so stdout stays usable
/// for reports and JSON output.
///
/// The returned guard flushes buffered events on drop and must live until
/// the program exits.
pub fn init(env: &EnvVars) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = build_filter(env.log.as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);

    // A subscriber may already be installed (e.g. by a test harness).
    let installed = if env.wants_json_logs() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = installed {
        eprintln!("warning: logging not initialized: {e}");
    }

    guard
}

fn build_filter(directives: Option<&str>) -> EnvFilter {
    let directives = directives.unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter {directives:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}
