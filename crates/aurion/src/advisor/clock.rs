use std::fmt;

use chrono::Timelike;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AdvisorError;

/// Hour of the day, 0 through 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    pub fn new(hour: u8) -> Result<Self, AdvisorError> {
        if hour < 24 {
            Ok(Self(hour))
        } else {
            Err(AdvisorError::InvalidArgument(format!(
                "hour must be between 0 and 23, got {}",
                hour
            )))
        }
    }

    /// Hour component of a wall-clock time.
    pub fn of<T: Timelike>(time: &T) -> Self {
        // chrono guarantees 0..=23
        Self(time.hour() as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Hour {
    type Error = AdvisorError;

    fn try_from(hour: u8) -> Result<Self, Self::Error> {
        Self::new(hour)
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h", self.0)
    }
}

/// Source of the current hour.
///
/// The engine asks its clock once per evaluation; rules only ever see the
/// resulting [`Hour`].
pub trait Clock {
    fn hour(&self) -> Hour;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> Hour {
        Hour::of(&chrono::Local::now())
    }
}

/// A clock stuck at one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Hour);

impl Clock for FixedClock {
    fn hour(&self) -> Hour {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn hour(&self) -> Hour {
        (**self).hour()
    }
}
