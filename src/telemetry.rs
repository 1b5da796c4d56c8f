use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "octofit=debug,axum=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
pub fn init() {
    let json_logs = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    if json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}
