/// Errors surfaced by the recommendation engine.
///
/// Missing or partial snapshot data is never an error: rules that cannot
/// see what they need simply do not fire. The only failure is a caller
/// handing over something that is not a snapshot at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
