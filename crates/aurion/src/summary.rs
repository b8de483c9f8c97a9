//! Headline figures for the dashboard.

use serde::Serialize;
use strum::Display;

use crate::model::SensorStatus;
use crate::model::Snapshot;

/// Battery health bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BatteryLevel {
    Critical,
    Low,
    Good,
    Excellent,
}

impl BatteryLevel {
    pub fn classify(percent: f64) -> Self {
        if percent >= 80.0 {
            BatteryLevel::Excellent
        } else if percent >= 50.0 {
            BatteryLevel::Good
        } else if percent >= 20.0 {
            BatteryLevel::Low
        } else {
            BatteryLevel::Critical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomDevices {
    pub room: String,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorHealth {
    pub name: String,
    pub battery: f64,
    pub level: BatteryLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub active_devices: usize,
    pub total_devices: usize,
    /// Share of devices switched on, rounded to a whole percent.
    pub active_percentage: u32,
    pub unacknowledged_alerts: usize,
    pub active_sensors: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_kw: Option<f64>,
    /// Rooms in the order they first appear in the snapshot.
    pub devices_by_room: Vec<RoomDevices>,
    /// Sensors reporting a battery level.
    pub batteries: Vec<SensorHealth>,
}

impl Summary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let active_devices = snapshot.active_devices().count();
        let total_devices = snapshot.devices.len();

        let mut devices_by_room: Vec<RoomDevices> = Vec::new();
        for device in &snapshot.devices {
            match devices_by_room.iter_mut().find(|r| r.room == device.room) {
                Some(group) => group.devices.push(device.name.clone()),
                None => devices_by_room.push(RoomDevices {
                    room: device.room.clone(),
                    devices: vec![device.name.clone()],
                }),
            }
        }

        let batteries = snapshot
            .sensors
            .iter()
            .filter_map(|s| {
                s.battery.map(|battery| SensorHealth {
                    name: s.name.clone(),
                    battery,
                    level: BatteryLevel::classify(battery),
                })
            })
            .collect();

        Self {
            active_devices,
            total_devices,
            active_percentage: percentage(active_devices, total_devices),
            unacknowledged_alerts: snapshot.unacknowledged_alerts().count(),
            active_sensors: snapshot
                .sensors
                .iter()
                .filter(|s| s.status == Some(SensorStatus::Active))
                .count(),
            current_kw: snapshot.energy_reading.current,
            devices_by_room,
            batteries,
        }
    }
}

fn percentage(value: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u32
}
