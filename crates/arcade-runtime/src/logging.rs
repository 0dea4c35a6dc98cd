//! Log output for the arcade binaries.
//!
//! Crates log through the `log` macros; the player installs `env_logger` as
//! the sink at startup. Directives pick the first of: the player's `--log`
//! flag, `RUST_LOG`, then [`DEFAULT_DIRECTIVES`].

use std::sync::Once;

use env_logger::WriteStyle;

/// Info for the arcade crates, warnings only from the GPU stack.
pub const DEFAULT_DIRECTIVES: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` directives from the command line, e.g. "arcade_games=debug"
    pub directives: Option<String>,
    pub color: WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directives: None,
            color: WriteStyle::Auto,
        }
    }
}

/// Directives to install, given the command-line value and `RUST_LOG`.
pub fn resolve_directives(cli: Option<&str>, env: Option<&str>) -> String {
    cli.or(env)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVES)
        .to_string()
}

static INSTALLED: Once = Once::new();

/// Install the logger. Only the first call in a process has an effect.
pub fn init_logging(config: LoggingConfig) {
    INSTALLED.call_once(|| {
        let env = std::env::var("RUST_LOG").ok();
        let directives = resolve_directives(config.directives.as_deref(), env.as_deref());

        let installed = env_logger::Builder::new()
            .parse_filters(&directives)
            .write_style(config.color)
            .try_init();
        // A test harness may already own the global logger.
        if installed.is_ok() {
            log::debug!("logger installed ({directives})");
        }
    });
}
