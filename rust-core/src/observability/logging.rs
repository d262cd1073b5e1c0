use crate::config::{LogFormat, LoggingConfig};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber once. `RUST_LOG` wins over the configured level.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn setup_logging(config: &LoggingConfig) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);

        let result = match config.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        // Another subscriber (a host application or test harness) may already be set.
        if let Err(err) = result {
            tracing::debug!("Logging already initialised: {}", err);
        }
    });
}

#[macro_export]
macro_rules! log_projection {
    ($level:ident, $($arg:tt)*) => {
        ::tracing::$level!(
            target: "projection",
            $($arg)*
        );
    };
}
