//! Logging setup for indexing runs.
//!
//! Compact timestamped output. The configured default level applies to this
//! crate; dependencies stay at `warn`. Overrides are keyed by module path or
//! by the component tag events carry (`indexer`, `hierarchy`, `children`,
//! `folders`, `tree`). `RUST_LOG` replaces the configured filter entirely.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "info"
//!
//! [logging.modules]
//! children = "trace"
//! "orgindex::tree" = "debug"
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=orgindex=trace my-tool list-metadata
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

const CRATE_TARGET: &str = "orgindex";
const DEPENDENCY_LEVEL: &str = "warn";

/// Module path for an override key. Component tags map to the module that
/// emits them; anything else is taken as a path.
fn component_target(key: &str) -> String {
    let module = match key {
        "indexer" => "indexing",
        "hierarchy" => "indexing::hierarchy",
        "children" => "indexing::children",
        "folders" => "indexing::folders",
        "tree" => "tree",
        path => return path.to_string(),
    };
    format!("{CRATE_TARGET}::{module}")
}

/// Build the filter directive string from configuration.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut overrides: Vec<_> = config
        .modules
        .iter()
        .map(|(key, level)| (component_target(key), level))
        .collect();
    overrides.sort();

    let mut filter_str = format!("{DEPENDENCY_LEVEL},{CRATE_TARGET}={}", config.default);
    for (target, level) in overrides {
        filter_str.push_str(&format!(",{target}={level}"));
    }
    filter_str
}

/// Initialize logging with configuration.
///
/// Only the first call takes effect. A subscriber installed elsewhere in the
/// host process is left alone.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}

/// Initialize logging with `LoggingConfig::default()` (warn level).
pub fn init() {
    init_with_config(&LoggingConfig::default());
}

/// Log an event tagged with the component that produced it.
///
/// The tag is both the `[component]` message prefix and a structured
/// `component` field.
///
/// # Examples
/// ```ignore
/// log_event!("indexer", "listed", "{} types", count);
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!(component = $component, "[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!(component = $component, "[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
///
/// # Examples
/// ```ignore
/// debug_event!("children", "retrieved", "{}", dir.display());
/// ```
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!(component = $component, "[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!(component = $component, "[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}
