//! Layered configuration for the Clove evaluation client.
//!
//! Values are merged by `ortho_config` from a TOML file (`--config-path` or
//! `CLOVE_CONFIG_PATH`), `CLOVE_*` environment variables and command-line
//! flags, in increasing order of precedence. Editor hosts that keep their own
//! settings store can build a [`Config`] directly instead of loading one.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ALERT_ON_EVAL, DEFAULT_AUTO_RELOAD_NAMESPACE_ON_SAVE, DEFAULT_LOG_FILTER,
    default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError, LogSettings};

/// Settings shared by the evaluation commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CLOVE")]
pub struct Config {
    /// Replace rendered results with a short toast when evaluating silently.
    #[ortho_config(default = DEFAULT_ALERT_ON_EVAL)]
    pub alert_on_eval: bool,
    /// Editor-wide alias of `alert_on_eval`; either one enables alerts.
    #[ortho_config(default = DEFAULT_ALERT_ON_EVAL)]
    pub editor_alert_on_eval: bool,
    /// Reload the namespace of a file whenever it is saved.
    #[ortho_config(default = DEFAULT_AUTO_RELOAD_NAMESPACE_ON_SAVE)]
    pub auto_reload_namespace_on_save: bool,
    /// `tracing-subscriber` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alert_on_eval: DEFAULT_ALERT_ON_EVAL,
            editor_alert_on_eval: DEFAULT_ALERT_ON_EVAL,
            auto_reload_namespace_on_save: DEFAULT_AUTO_RELOAD_NAMESPACE_ON_SAVE,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Whether silent evaluations should raise toasts instead of rendering.
    ///
    /// The project flag and its editor-wide alias are folded into a single
    /// answer so callers never consult two sources.
    #[must_use]
    pub fn effective_alert_on_eval(&self) -> bool {
        self.alert_on_eval || self.editor_alert_on_eval
    }

    /// Whether saving a file should reload its namespace.
    #[must_use]
    pub fn auto_reload_namespace_on_save(&self) -> bool {
        self.auto_reload_namespace_on_save
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Logging settings for telemetry initialisation.
    #[must_use]
    pub fn log_settings(&self) -> LogSettings {
        LogSettings::new(self.log_filter.clone(), self.log_format)
    }
}
