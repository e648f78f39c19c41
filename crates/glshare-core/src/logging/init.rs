use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. "glshare_core=debug". Takes
    /// precedence over `RUST_LOG`.
    pub env_filter: Option<String>,

    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: LevelFilter,

    /// Crates held at `warn` under the default level; the windowing stack is
    /// chatty at `info`.
    pub quiet_crates: Vec<&'static str>,

    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            quiet_crates: vec!["winit"],
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Filter directives actually applied, and where they came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum FilterSource {
    Config(String),
    Environment(String),
    Default(String),
}

impl FilterSource {
    fn directives(&self) -> &str {
        match self {
            FilterSource::Config(d) | FilterSource::Environment(d) | FilterSource::Default(d) => d,
        }
    }
}

pub(crate) fn resolve_filter(config: &LoggingConfig, rust_log: Option<String>) -> FilterSource {
    if let Some(filter) = config.env_filter.clone().filter(|f| !f.trim().is_empty()) {
        return FilterSource::Config(filter);
    }
    if let Some(filter) = rust_log.filter(|f| !f.trim().is_empty()) {
        return FilterSource::Environment(filter);
    }

    let mut directives = config.default_level.to_string().to_lowercase();
    if config.default_level > LevelFilter::Warn {
        for name in &config.quiet_crates {
            directives.push_str(&format!(",{name}=warn"));
        }
    }
    FilterSource::Default(directives)
}

static INIT: Once = Once::new();
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installs `env_logger` as the global logger on first call.
///
/// Returns whether this crate's logger is the installed one. A host that
/// already set its own logger keeps it; the failure goes to stderr.
pub fn init_logging(config: LoggingConfig) -> bool {
    INIT.call_once(|| {
        let source = resolve_filter(&config, std::env::var("RUST_LOG").ok());
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(source.directives());
        builder.write_style(config.write_style);

        match builder.try_init() {
            Ok(()) => {
                INSTALLED.store(true, Ordering::Release);
                log::debug!("logging initialized ({source:?})");
            }
            Err(e) => eprintln!("glshare: logger not installed: {e}"),
        }
    });
    INSTALLED.load(Ordering::Acquire)
}
