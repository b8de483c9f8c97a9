//! Recommendation engine.
//!
//! A stateless evaluator: a [`Snapshot`](crate::model::Snapshot) and an hour
//! of the day go in, an ordered list of recommendations comes out. No I/O,
//! no logging, no state kept between calls.

mod advisor;
mod clock;
mod rules;

pub use advisor::generate_recommendations;
pub use advisor::Advisor;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::Hour;
pub use clock::SystemClock;
pub use rules::is_night;
pub use rules::is_peak_hour;
pub use rules::is_work_hours;
pub use rules::HIGH_CONSUMPTION_KW;
pub use rules::HIGH_POWER_WATTS;
pub use rules::LOW_BATTERY_PERCENT;
pub use rules::MAX_ACTIONS;
pub use rules::SECURITY_VIEW;
