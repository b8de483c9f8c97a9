use aurion::generate_recommendations;
use aurion::Action;
use aurion::Hour;
use aurion::RuleId;
use aurion::Severity;
use aurion::Snapshot;
use serde_json::json;

fn hour(h: u8) -> Hour {
    Hour::new(h).unwrap()
}

fn snapshot(value: serde_json::Value) -> Snapshot {
    Snapshot::from_value(value).unwrap()
}

fn ids(snapshot: &Snapshot, h: u8) -> Vec<RuleId> {
    generate_recommendations(snapshot, hour(h))
        .into_iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn test_high_consumption_suggests_active_devices() {
    let snapshot = snapshot(json!({
        "devices": [
            { "id": 1, "name": "Lampe", "type": "light", "room": "Salon", "status": true, "power": 60 },
            { "id": 2, "name": "Four", "type": "appliance", "room": "Cuisine", "status": true, "power": 1500 }
        ],
        "energyReading": { "current": 3.0 }
    }));

    let recs = generate_recommendations(&snapshot, hour(12));
    let energy = recs.iter().find(|r| r.id == RuleId::EnergyHigh).unwrap();

    assert_eq!(energy.severity, Severity::Warning);
    assert!(energy.details.contains('3'));
    let devices: Vec<String> = energy
        .actions
        .iter()
        .map(|a| match a {
            Action::Toggle { device_id, .. } => device_id.to_string(),
            other => panic!("unexpected action {:?}", other),
        })
        .collect();
    assert_eq!(devices, vec!["1", "2"]);
    assert_eq!(energy.actions[1].label(), "Switch off Four");
}

#[test]
fn test_single_light_late_at_night() {
    let snapshot = snapshot(json!({
        "devices": [{ "id": "l1", "name": "Chevet", "type": "light", "status": true }]
    }));

    let recs = generate_recommendations(&snapshot, hour(23));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, RuleId::LightsNight);
    assert!(recs[0].details.contains('1'));
}

#[test]
fn test_only_unacknowledged_alerts_count() {
    let snapshot = snapshot(json!({
        "alerts": [
            { "id": 1, "acknowledged": false },
            { "id": 2, "acknowledged": true }
        ]
    }));

    let recs = generate_recommendations(&snapshot, hour(12));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, RuleId::SecurityAlerts);
    assert_eq!(recs[0].severity, Severity::Critical);
    assert!(recs[0].details.contains('1'));
    assert!(matches!(
        recs[0].actions.as_slice(),
        [Action::Navigate { to, .. }] if to == "/security"
    ));
}

#[test]
fn test_away_mode_without_energy_reading() {
    let snapshot = snapshot(json!({
        "devices": [{ "id": 1, "name": "TV", "type": "entertainment", "status": true, "power": 120 }],
        "alerts": [],
        "sensors": [],
        "energyReading": {},
        "settings": { "awayMode": false }
    }));

    let recs = generate_recommendations(&snapshot, hour(10));
    let away = recs.iter().find(|r| r.id == RuleId::AwayMode).unwrap();
    assert!(matches!(
        away.actions.as_slice(),
        [Action::Away { enabled: true, .. }]
    ));
    assert!(recs.iter().all(|r| r.id != RuleId::EnergyHigh));
}

#[test]
fn test_low_battery_counts_only_sensors_at_or_below_fifty() {
    let snapshot = snapshot(json!({
        "sensors": [
            { "id": 1, "name": "Porte", "battery": 10 },
            { "id": 2, "name": "Fenêtre", "battery": 55 },
            { "id": 3, "name": "Garage", "battery": 90 },
            { "id": 4, "name": "Fumée", "battery": 40 }
        ]
    }));

    let recs = generate_recommendations(&snapshot, hour(12));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, RuleId::SensorBattery);
    assert!(recs[0].details.contains('2'));
    assert_eq!(recs[0].actions.len(), 2);
    assert_eq!(recs[0].actions[1].label(), "Replace battery: Fumée");
}

#[test]
fn test_peak_hour_filters_low_power_devices() {
    let snapshot = snapshot(json!({
        "devices": [
            { "id": 1, "name": "Radiateur", "type": "climate", "status": true, "power": 150 },
            { "id": 2, "name": "Lampe", "type": "light", "status": true, "power": 50 }
        ],
        "settings": { "awayMode": true }
    }));

    let recs = generate_recommendations(&snapshot, hour(19));
    let peak = recs.iter().find(|r| r.id == RuleId::PeakHour).unwrap();
    assert_eq!(peak.actions.len(), 1);
    assert_eq!(peak.actions[0].device_id().unwrap().to_string(), "1");
}

#[test]
fn test_every_rule_fires_in_order() {
    // 08:00 is both work hours and peak; 23:00 is night.
    let snapshot = snapshot(json!({
        "devices": [
            { "id": 1, "name": "Lampe", "type": "light", "status": true, "power": 60 },
            { "id": 2, "name": "Four", "type": "appliance", "status": true, "power": 1500 }
        ],
        "energyReading": { "current": 4.1 },
        "sensors": [{ "id": 1, "name": "Porte", "battery": 5 }],
        "alerts": [{ "id": 1, "acknowledged": false }]
    }));

    assert_eq!(
        ids(&snapshot, 8),
        vec![
            RuleId::EnergyHigh,
            RuleId::SecurityAlerts,
            RuleId::AwayMode,
            RuleId::SensorBattery,
            RuleId::PeakHour,
        ]
    );
    assert_eq!(
        ids(&snapshot, 23),
        vec![
            RuleId::EnergyHigh,
            RuleId::LightsNight,
            RuleId::SecurityAlerts,
            RuleId::SensorBattery,
        ]
    );
}

#[test]
fn test_output_shape_matches_dashboard_records() {
    let snapshot = snapshot(json!({
        "alerts": [{ "id": 9, "acknowledged": false }]
    }));

    let recs = generate_recommendations(&snapshot, hour(3));
    assert_eq!(
        serde_json::to_value(&recs).unwrap(),
        json!([{
            "id": "security-alerts",
            "title": "Unacknowledged security alerts",
            "details": "You have 1 pending alert(s).",
            "severity": "critical",
            "actions": [{ "type": "navigate", "to": "/security", "label": "View alerts" }]
        }])
    );
}
