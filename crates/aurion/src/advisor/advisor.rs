use super::clock::Clock;
use super::clock::Hour;
use super::clock::SystemClock;
use super::rules::Context;
use super::rules::RULES;
use crate::locale::Locale;
use crate::model::Recommendation;
use crate::model::Snapshot;

/// Evaluate every rule against `snapshot` at `hour`, in English.
///
/// The result holds at most one recommendation per rule, in rule order.
pub fn generate_recommendations(snapshot: &Snapshot, hour: Hour) -> Vec<Recommendation> {
    evaluate(snapshot, hour, Locale::default())
}

fn evaluate(snapshot: &Snapshot, hour: Hour, locale: Locale) -> Vec<Recommendation> {
    let ctx = Context {
        snapshot,
        hour,
        locale,
    };
    RULES.iter().filter_map(|rule| rule.evaluate(&ctx)).collect()
}

/// Recommendation engine bound to a clock and a locale.
///
/// Holds no state between evaluations, so one instance can be shared freely
/// between callers.
#[derive(Debug, Clone, Default)]
pub struct Advisor<C = SystemClock> {
    clock: C,
    locale: Locale,
}

impl Advisor<SystemClock> {
    /// An advisor reading the local wall clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Advisor<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Current hour according to this advisor's clock.
    pub fn hour(&self) -> Hour {
        self.clock.hour()
    }

    /// Evaluate at the hour the clock reports now.
    pub fn recommend(&self, snapshot: &Snapshot) -> Vec<Recommendation> {
        self.recommend_at(snapshot, self.clock.hour())
    }

    /// Evaluate at an explicit hour, ignoring the clock.
    pub fn recommend_at(&self, snapshot: &Snapshot, hour: Hour) -> Vec<Recommendation> {
        evaluate(snapshot, hour, self.locale)
    }
}
