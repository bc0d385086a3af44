//! Tracing setup for the command line.
//!
//! Events go to stderr so stdout stays clean JSON. `RUST_LOG` takes
//! precedence over the level derived from `-q`/`-v`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;

use crate::args::GlobalArgs;

/// `debug` is the settings flag; it raises the default like one `-v`.
fn default_directive(args: &GlobalArgs, debug: bool) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose.max(u8::from(debug)) {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must outlive
/// every event that should reach the log file.
pub fn init_tracing(args: &GlobalArgs, debug: bool) -> Option<WorkerGuard> {
    let directive = default_directive(args, debug);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter(directive));

    let (file_layer, guard) = match args.log_dir.as_deref() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "nsite.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter(directive));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default().with(stderr_layer).with(file_layer).init();

    guard
}
