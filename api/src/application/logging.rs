use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::LogArgs;

/// Installs the global subscriber. `RUST_LOG` wins over `--log-filter`.
pub fn init_logger(args: &LogArgs) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = if args.json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };
}
