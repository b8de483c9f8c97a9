use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use strum::Display;
use strum::EnumString;

use super::lenient;
use crate::error::AdvisorError;

/// Record identifier. The dashboard services hand out both numeric and
/// string ids, so both are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    /// Any other JSON number (fractional, or outside the `i64` range).
    Decimal(serde_json::Number),
    Text(String),
}

impl Default for Id {
    fn default() -> Self {
        Id::Text(String::new())
    }
}

impl<'de> Deserialize<'de> for Id {
    /// Ids are only carried through to actions, so a value of any other
    /// type becomes the empty id.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64().map_or(Id::Decimal(n), Id::Number),
            Value::String(s) => Id::Text(s),
            _ => Id::default(),
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Decimal(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

/// Kind of controllable device.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Light,
    Climate,
    Entertainment,
    Fan,
    Appliance,
    #[default]
    Other,
}

/// A controllable device as reported by the device service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: Id,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,

    #[serde(rename = "type", default, deserialize_with = "lenient::keyword")]
    pub device_type: DeviceType,

    #[serde(default, deserialize_with = "lenient::text")]
    pub room: String,

    /// Whether the device is currently switched on.
    #[serde(default, deserialize_with = "lenient::flag")]
    pub status: bool,

    /// Draw in watts.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub power: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature: Option<f64>,
}

impl Device {
    pub fn is_light(&self) -> bool {
        self.device_type == DeviceType::Light
    }
}

/// Latest reading from the energy service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReading {
    /// Instantaneous draw in kW.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub current: Option<f64>,

    /// Consumption so far today in kWh.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub today: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub trend: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SensorStatus {
    Active,
    Inactive,
}

/// A security sensor (door contact, motion, smoke...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    #[serde(default)]
    pub id: Id,

    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "lenient::optional_keyword",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<SensorStatus>,

    /// Battery charge in percent, when the sensor reports one.
    #[serde(
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub battery: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub id: Id,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub acknowledged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub away_mode: bool,
}

/// Everything the engine looks at for one evaluation.
///
/// Built fresh by the caller for every evaluation and never modified by the
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub devices: Vec<Device>,

    #[serde(default, alias = "energyData", deserialize_with = "lenient::or_default")]
    pub energy_reading: EnergyReading,

    #[serde(default)]
    pub sensors: Vec<Sensor>,

    #[serde(default)]
    pub alerts: Vec<Alert>,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub settings: Settings,
}

impl Snapshot {
    /// Build a snapshot from an already parsed JSON document.
    ///
    /// Fails only when the document is not an object, or when one of the
    /// record lists is present but is not a list of records.
    pub fn from_value(mut value: Value) -> Result<Self, AdvisorError> {
        let Some(fields) = value.as_object_mut() else {
            return Err(AdvisorError::InvalidArgument(format!(
                "snapshot must be a JSON object, got {}",
                json_kind(&value)
            )));
        };

        // `energyReading` wins over the older `energyData` name.
        if fields.contains_key("energyReading") {
            fields.remove("energyData");
        }

        serde_json::from_value(value).map_err(|e| AdvisorError::InvalidArgument(e.to_string()))
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(json: &str) -> Result<Self, AdvisorError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AdvisorError::InvalidArgument(format!("malformed JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Devices currently switched on, in snapshot order.
    pub fn active_devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.status)
    }

    /// Lights currently switched on, in snapshot order.
    pub fn active_lights(&self) -> impl Iterator<Item = &Device> {
        self.active_devices().filter(|d| d.is_light())
    }

    pub fn unacknowledged_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.acknowledged)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
