use std::collections::BTreeSet;

use aurion::advisor::is_night;
use aurion::advisor::is_peak_hour;
use aurion::advisor::is_work_hours;
use aurion::generate_recommendations;
use aurion::model::Alert;
use aurion::model::Device;
use aurion::model::DeviceType;
use aurion::model::EnergyReading;
use aurion::model::Id;
use aurion::model::Sensor;
use aurion::model::Settings;
use aurion::Hour;
use aurion::RuleId;
use aurion::Snapshot;
use proptest::prelude::*;

fn arb_device_type() -> impl Strategy<Value = DeviceType> {
    prop_oneof![
        Just(DeviceType::Light),
        Just(DeviceType::Climate),
        Just(DeviceType::Entertainment),
        Just(DeviceType::Fan),
        Just(DeviceType::Appliance),
        Just(DeviceType::Other),
    ]
}

fn arb_device() -> impl Strategy<Value = Device> {
    (
        0i64..1000,
        arb_device_type(),
        any::<bool>(),
        proptest::option::of(0.0f64..3000.0),
    )
        .prop_map(|(id, device_type, status, power)| Device {
            id: Id::Number(id),
            name: format!("device-{}", id),
            device_type,
            room: "Salon".to_string(),
            status,
            power,
            temperature: None,
        })
}

fn arb_sensor() -> impl Strategy<Value = Sensor> {
    (0i64..1000, proptest::option::of(0.0f64..=100.0)).prop_map(|(id, battery)| Sensor {
        id: Id::Number(id),
        name: format!("sensor-{}", id),
        status: None,
        battery,
    })
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    (
        proptest::collection::vec(arb_device(), 0..8),
        proptest::option::of(0.0f64..6.0),
        proptest::collection::vec(arb_sensor(), 0..6),
        proptest::collection::vec(any::<bool>(), 0..5),
        any::<bool>(),
    )
        .prop_map(|(devices, current, sensors, alerts, away_mode)| Snapshot {
            devices,
            energy_reading: EnergyReading {
                current,
                ..EnergyReading::default()
            },
            sensors,
            alerts: alerts
                .into_iter()
                .enumerate()
                .map(|(i, acknowledged)| Alert {
                    id: Id::Number(i as i64),
                    acknowledged,
                })
                .collect(),
            settings: Settings { away_mode },
        })
}

fn arb_hour() -> impl Strategy<Value = Hour> {
    (0u8..24).prop_map(|h| Hour::new(h).unwrap())
}

/// Which rules should fire, worked out directly from the snapshot.
fn expected_rules(s: &Snapshot, hour: Hour) -> BTreeSet<RuleId> {
    let mut expected = BTreeSet::new();
    if s.energy_reading.current.is_some_and(|c| c > 2.5) {
        expected.insert(RuleId::EnergyHigh);
    }
    if is_night(hour) && s.devices.iter().any(|d| d.is_light() && d.status) {
        expected.insert(RuleId::LightsNight);
    }
    if s.alerts.iter().any(|a| !a.acknowledged) {
        expected.insert(RuleId::SecurityAlerts);
    }
    if !s.settings.away_mode && is_work_hours(hour) && s.devices.iter().any(|d| d.status) {
        expected.insert(RuleId::AwayMode);
    }
    if s.sensors.iter().any(|x| x.battery.is_some_and(|b| b <= 50.0)) {
        expected.insert(RuleId::SensorBattery);
    }
    if is_peak_hour(hour) {
        expected.insert(RuleId::PeakHour);
    }
    expected
}

proptest! {
    #[test]
    fn output_follows_rule_order_without_duplicates(s in arb_snapshot(), hour in arb_hour()) {
        let recs = generate_recommendations(&s, hour);
        for pair in recs.windows(2) {
            prop_assert!(pair[0].id < pair[1].id, "{:?} before {:?}", pair[0].id, pair[1].id);
        }
    }

    #[test]
    fn fires_exactly_the_rules_whose_condition_holds(s in arb_snapshot(), hour in arb_hour()) {
        let fired: BTreeSet<RuleId> = generate_recommendations(&s, hour)
            .into_iter()
            .map(|r| r.id)
            .collect();
        prop_assert_eq!(fired, expected_rules(&s, hour));
    }

    #[test]
    fn action_counts_are_bounded(s in arb_snapshot(), hour in arb_hour()) {
        for rec in generate_recommendations(&s, hour) {
            match rec.id {
                RuleId::SecurityAlerts | RuleId::AwayMode => prop_assert_eq!(rec.actions.len(), 1),
                _ => prop_assert!(rec.actions.len() <= 3),
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent(s in arb_snapshot(), hour in arb_hour()) {
        let first = generate_recommendations(&s, hour);
        let second = generate_recommendations(&s.clone(), hour);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn snapshot_is_left_untouched(s in arb_snapshot(), hour in arb_hour()) {
        let before = s.clone();
        let _ = generate_recommendations(&s, hour);
        prop_assert_eq!(before, s);
    }
}
