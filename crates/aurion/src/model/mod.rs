//! Data model shared by the engine and its surfaces.
//!
//! `Snapshot` is what callers assemble from the device, energy and security
//! services; `Recommendation` is what the engine hands back.

mod lenient;
mod recommendation;
mod snapshot;

pub use recommendation::Action;
pub use recommendation::Recommendation;
pub use recommendation::RuleId;
pub use recommendation::Severity;
pub use snapshot::Alert;
pub use snapshot::Device;
pub use snapshot::DeviceType;
pub use snapshot::EnergyReading;
pub use snapshot::Id;
pub use snapshot::Sensor;
pub use snapshot::SensorStatus;
pub use snapshot::Settings;
pub use snapshot::Snapshot;
