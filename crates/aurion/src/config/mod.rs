mod config;
mod diagnostics;
mod partial;

pub use config::*;
pub use diagnostics::format_diagnostics;
pub use diagnostics::Diagnostic;
pub use diagnostics::Error;
pub use diagnostics::LoadError;
pub use diagnostics::MergeConflictLocation;
pub use diagnostics::MergeError;
pub use diagnostics::SourceInfo;
pub use diagnostics::ValidationError;
pub use diagnostics::Warning;
