//! Configuration for analysis and fixes
//!
//! All tunables, including the canonical modifier order, live in
//! [`AnalyzerOptions`]. The options object is passed explicitly into every
//! analyzer and fix call; nothing is read from global state.

mod loader;
mod options;

pub use loader::{ConfigLoader, config_schema};
pub use options::{AnalyzerOptions, DEFAULT_MODIFIER_ORDER, RuleSeverity, RulesConfiguration};
