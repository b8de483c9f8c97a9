//! Carrying out accepted recommendations.
//!
//! The engine only describes intent. Whoever renders recommendations
//! implements [`ActionHandler`] to wire each action to the real operation.

use std::convert::Infallible;

use tracing::info;

use crate::model::Action;
use crate::model::Id;

/// Effectful side of every [`Action`] variant.
pub trait ActionHandler {
    type Error;

    fn toggle_device(&mut self, device_id: &Id) -> Result<(), Self::Error>;

    fn navigate(&mut self, to: &str) -> Result<(), Self::Error>;

    fn set_away_mode(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Informational actions have no effect by default.
    fn note(&mut self, _label: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Action {
    /// Hand this action to the matching handler method.
    pub fn dispatch<H: ActionHandler + ?Sized>(&self, handler: &mut H) -> Result<(), H::Error> {
        match self {
            Action::Toggle { device_id, .. } => handler.toggle_device(device_id),
            Action::Navigate { to, .. } => handler.navigate(to),
            Action::Away { enabled, .. } => handler.set_away_mode(*enabled),
            Action::Note { label } => handler.note(label),
        }
    }
}

/// Handler that only logs what it would do.
#[derive(Debug, Default)]
pub struct DryRun {
    pub applied: usize,
}

impl ActionHandler for DryRun {
    type Error = Infallible;

    fn toggle_device(&mut self, device_id: &Id) -> Result<(), Self::Error> {
        info!(device_id = %device_id, "would switch device off");
        self.applied += 1;
        Ok(())
    }

    fn navigate(&mut self, to: &str) -> Result<(), Self::Error> {
        info!(to, "would navigate");
        self.applied += 1;
        Ok(())
    }

    fn set_away_mode(&mut self, enabled: bool) -> Result<(), Self::Error> {
        info!(enabled, "would set away mode");
        self.applied += 1;
        Ok(())
    }

    fn note(&mut self, label: &str) -> Result<(), Self::Error> {
        info!(label, "note");
        Ok(())
    }
}
