pub mod actions;
pub mod advisor;
pub mod api;
pub mod config;
mod error;
pub mod locale;
pub mod model;
pub mod render;
pub mod summary;

pub use actions::ActionHandler;
pub use advisor::generate_recommendations;
pub use advisor::Advisor;
pub use advisor::Clock;
pub use advisor::FixedClock;
pub use advisor::Hour;
pub use advisor::SystemClock;
pub use config::format_diagnostics;
pub use config::Config;
pub use config::Diagnostic;
pub use config::LogLevel;
pub use error::AdvisorError;
pub use locale::Locale;
pub use model::Action;
pub use model::Recommendation;
pub use model::RuleId;
pub use model::Severity;
pub use model::Snapshot;
pub use summary::Summary;
