use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    EnvFilter,
};

pub const SERVER_DIRECTIVE: &str = "hvac_dashboard=info";
pub const REPORT_DIRECTIVE: &str = "hvac_dashboard=warn";

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Logs go to stderr; stdout belongs to command output.
pub fn init_tracing(default_directive: &str) {
    let directive: Directive = default_directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
