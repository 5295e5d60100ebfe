use crate::logging::LogFormat;

/// Default log filter expression used by editor integrations.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by editor integrations.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Evaluation results are rendered in the output channel unless a user opts
/// into toast alerts.
pub const DEFAULT_ALERT_ON_EVAL: bool = false;

/// Saving a file does not reload its namespace unless enabled.
pub const DEFAULT_AUTO_RELOAD_NAMESPACE_ON_SAVE: bool = false;
