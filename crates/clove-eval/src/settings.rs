//! Resolved configuration flags consulted during evaluation.

use clove_config::Config;

/// Boolean settings read at the start of each decision.
///
/// Implementations resolve aliases themselves, so the evaluator asks a
/// single question per flag.
pub trait EvalSettings: Send + Sync {
    /// Whether silent evaluations report through toasts instead of output.
    fn effective_alert_on_eval(&self) -> bool;

    /// Whether saving a document reloads its namespace.
    fn auto_reload_namespace_on_save(&self) -> bool;
}

impl EvalSettings for Config {
    fn effective_alert_on_eval(&self) -> bool {
        Config::effective_alert_on_eval(self)
    }

    fn auto_reload_namespace_on_save(&self) -> bool {
        Config::auto_reload_namespace_on_save(self)
    }
}
