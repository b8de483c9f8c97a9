use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;

use super::Id;

/// Identifies the rule that produced a recommendation.
///
/// Declaration order is evaluation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RuleId {
    EnergyHigh,
    LightsNight,
    SecurityAlerts,
    AwayMode,
    SensorBattery,
    PeakHour,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// A suggested remedy. The engine only describes it; whoever renders the
/// recommendation decides how to carry it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Switch a device off.
    Toggle {
        #[serde(rename = "deviceId")]
        device_id: Id,
        label: String,
    },
    /// Open a view of the dashboard.
    Navigate { to: String, label: String },
    /// Flip away mode.
    Away { enabled: bool, label: String },
    /// Informational only.
    Note { label: String },
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::Toggle { label, .. }
            | Action::Navigate { label, .. }
            | Action::Away { label, .. }
            | Action::Note { label } => label,
        }
    }

    /// The device a toggle action targets.
    pub fn device_id(&self) -> Option<&Id> {
        match self {
            Action::Toggle { device_id, .. } => Some(device_id),
            _ => None,
        }
    }
}

/// One suggestion produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RuleId,
    pub title: String,
    pub details: String,
    pub severity: Severity,
    pub actions: Vec<Action>,
}
