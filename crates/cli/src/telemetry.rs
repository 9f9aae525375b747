use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. `RUST_LOG` wins over `verbose`.
pub fn init_telemetry(verbose: bool) {
    let default_filter = if verbose {
        "ctxsnap=debug,ctxsnap_cli=debug"
    } else {
        "ctxsnap=warn,ctxsnap_cli=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
