use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "arbor_engine=debug,wgpu_core=warn"). When unset, `RUST_LOG` is consulted
/// and then [`LoggingConfig::DEFAULT_FILTER`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Include millisecond timestamps in each record.
    pub timestamps: bool,
}

impl LoggingConfig {
    /// wgpu's internals are chatty at info; keep them to warnings.
    pub const DEFAULT_FILTER: &'static str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

    /// Resolves the filter string this config will install.
    pub fn resolved_filter(&self) -> String {
        resolve_filter(self.env_filter.as_deref(), std::env::var("RUST_LOG").ok().as_deref())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; later calls are ignored. Call early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if config.timestamps {
            builder.format_timestamp_millis();
        } else {
            builder.format_timestamp(None);
        }

        // A logger may already be installed by a test harness; that is fine.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized (filter: {filter})");
    });
}

fn resolve_filter(explicit: Option<&str>, env: Option<&str>) -> String {
    explicit
        .or(env)
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(LoggingConfig::DEFAULT_FILTER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_env() {
        assert_eq!(resolve_filter(Some("debug"), Some("warn")), "debug");
    }

    #[test]
    fn env_filter_used_when_not_explicit() {
        assert_eq!(resolve_filter(None, Some("arbor_studio=trace")), "arbor_studio=trace");
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(resolve_filter(None, Some("  ")), LoggingConfig::DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, None), LoggingConfig::DEFAULT_FILTER);
    }
}
