//! The rule table.
//!
//! Each rule is an independent predicate/builder pair over the shared
//! snapshot. Rules never see each other's output.

use super::clock::Hour;
use crate::locale::Locale;
use crate::locale::Message;
use crate::model::Action;
use crate::model::Device;
use crate::model::Recommendation;
use crate::model::RuleId;
use crate::model::Severity;
use crate::model::Snapshot;

/// Instantaneous draw (kW) above which consumption is considered high.
pub const HIGH_CONSUMPTION_KW: f64 = 2.5;

/// Devices drawing at least this many watts are worth switching off at peak.
pub const HIGH_POWER_WATTS: f64 = 100.0;

/// Sensors at or below this charge (percent) need a new battery.
pub const LOW_BATTERY_PERCENT: f64 = 50.0;

/// Upper bound on actions derived from a candidate list.
pub const MAX_ACTIONS: usize = 3;

/// Route of the security view.
pub const SECURITY_VIEW: &str = "/security";

/// 22:00 through 05:59.
pub fn is_night(hour: Hour) -> bool {
    let h = hour.get();
    h >= 22 || h < 6
}

/// 08:00 through 18:59.
pub fn is_work_hours(hour: Hour) -> bool {
    (8..=18).contains(&hour.get())
}

/// 07:00 through 09:59 and 18:00 through 21:59.
pub fn is_peak_hour(hour: Hour) -> bool {
    let h = hour.get();
    (18..=21).contains(&h) || (7..=9).contains(&h)
}

pub(super) struct Context<'a> {
    pub snapshot: &'a Snapshot,
    pub hour: Hour,
    pub locale: Locale,
}

/// A rule is one check over the context: `None` when it does not apply,
/// otherwise the wording and actions of its recommendation.
pub(super) struct Rule {
    pub id: RuleId,
    pub severity: Severity,
    check: fn(&Context<'_>) -> Option<(Message, Vec<Action>)>,
}

impl Rule {
    pub fn evaluate(&self, ctx: &Context<'_>) -> Option<Recommendation> {
        let (message, actions) = (self.check)(ctx)?;
        Some(Recommendation {
            id: self.id,
            title: message.title,
            details: message.details,
            severity: self.severity,
            actions,
        })
    }
}

/// All rules, in evaluation order.
pub(super) static RULES: [Rule; 6] = [
    Rule {
        id: RuleId::EnergyHigh,
        severity: Severity::Warning,
        check: |ctx| {
            let current = high_consumption(ctx.snapshot)?;
            Some((
                ctx.locale.energy_high(current),
                suggest_device_switches(&ctx.snapshot.devices, false, ctx.locale),
            ))
        },
    },
    Rule {
        id: RuleId::LightsNight,
        severity: Severity::Info,
        check: |ctx| {
            let count = ctx.snapshot.active_lights().count();
            (is_night(ctx.hour) && count > 0).then(|| {
                (
                    ctx.locale.lights_night(count),
                    switch_off_actions(ctx.snapshot.active_lights(), ctx.locale),
                )
            })
        },
    },
    Rule {
        id: RuleId::SecurityAlerts,
        severity: Severity::Critical,
        check: |ctx| {
            let count = ctx.snapshot.unacknowledged_alerts().count();
            (count > 0).then(|| {
                (
                    ctx.locale.security_alerts(count),
                    vec![Action::Navigate {
                        to: SECURITY_VIEW.to_string(),
                        label: ctx.locale.view_alerts(),
                    }],
                )
            })
        },
    },
    Rule {
        id: RuleId::AwayMode,
        severity: Severity::Info,
        check: |ctx| {
            let applies = !ctx.snapshot.settings.away_mode
                && is_work_hours(ctx.hour)
                && ctx.snapshot.active_devices().next().is_some();
            applies.then(|| {
                (
                    ctx.locale.away_mode(),
                    vec![Action::Away {
                        enabled: true,
                        label: ctx.locale.enable_away_mode(),
                    }],
                )
            })
        },
    },
    Rule {
        id: RuleId::SensorBattery,
        severity: Severity::Warning,
        check: |ctx| {
            let count = low_battery_sensors(ctx.snapshot).count();
            (count > 0).then(|| {
                let actions = low_battery_sensors(ctx.snapshot)
                    .take(MAX_ACTIONS)
                    .map(|s| Action::Note {
                        label: ctx.locale.replace_battery(&s.name),
                    })
                    .collect();
                (ctx.locale.sensor_battery(count, LOW_BATTERY_PERCENT), actions)
            })
        },
    },
    Rule {
        id: RuleId::PeakHour,
        severity: Severity::Info,
        // Time-based advice: fires at peak regardless of the current load.
        check: |ctx| {
            is_peak_hour(ctx.hour).then(|| {
                (
                    ctx.locale.peak_hour(),
                    suggest_device_switches(&ctx.snapshot.devices, true, ctx.locale),
                )
            })
        },
    },
];

fn high_consumption(snapshot: &Snapshot) -> Option<f64> {
    snapshot
        .energy_reading
        .current
        .filter(|&kw| kw > HIGH_CONSUMPTION_KW)
}

fn low_battery_sensors(snapshot: &Snapshot) -> impl Iterator<Item = &crate::model::Sensor> {
    snapshot
        .sensors
        .iter()
        .filter(|s| s.battery.is_some_and(|b| b <= LOW_BATTERY_PERCENT))
}

/// Switch-off suggestions for devices that are on, optionally only the
/// power-hungry ones. Devices without a known draw never count as
/// power-hungry.
fn suggest_device_switches(devices: &[Device], high_power_only: bool, locale: Locale) -> Vec<Action> {
    let candidates = devices.iter().filter(|d| {
        d.status && (!high_power_only || d.power.is_some_and(|w| w >= HIGH_POWER_WATTS))
    });
    switch_off_actions(candidates, locale)
}

fn switch_off_actions<'a>(devices: impl Iterator<Item = &'a Device>, locale: Locale) -> Vec<Action> {
    devices
        .take(MAX_ACTIONS)
        .map(|d| Action::Toggle {
            device_id: d.id.clone(),
            label: locale.switch_off(&d.name),
        })
        .collect()
}
