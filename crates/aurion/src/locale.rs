//! User-facing text for recommendations.
//!
//! Rule ids and semantics never depend on the locale, only the wording does.

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

/// Title and body of a recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub details: String,
}

impl Message {
    fn new(title: &str, details: String) -> Self {
        Self {
            title: title.to_string(),
            details,
        }
    }
}

impl Locale {
    pub fn energy_high(self, current_kw: f64) -> Message {
        match self {
            Locale::En => Message::new(
                "Reduce current consumption",
                format!(
                    "Instantaneous consumption is {} kW. Switch off non-essential devices to lower the bill.",
                    current_kw
                ),
            ),
            Locale::Fr => Message::new(
                "Réduisez la consommation actuelle",
                format!(
                    "La consommation instantanée est de {} kW. Éteignez les appareils non essentiels pour réduire la facture.",
                    current_kw
                ),
            ),
        }
    }

    pub fn lights_night(self, count: usize) -> Message {
        match self {
            Locale::En => Message::new(
                "Lights on at night",
                format!(
                    "{} light(s) are on even though it is late. Consider switching them off.",
                    count
                ),
            ),
            Locale::Fr => Message::new(
                "Lumières allumées la nuit",
                format!(
                    "{} lumière(s) sont allumées alors qu'il est tard. Pensez à les éteindre.",
                    count
                ),
            ),
        }
    }

    pub fn security_alerts(self, count: usize) -> Message {
        match self {
            Locale::En => Message::new(
                "Unacknowledged security alerts",
                format!("You have {} pending alert(s).", count),
            ),
            Locale::Fr => Message::new(
                "Alertes de sécurité non acquittées",
                format!("Vous avez {} alerte(s) en attente.", count),
            ),
        }
    }

    pub fn away_mode(self) -> Message {
        match self {
            Locale::En => Message::new(
                "Enable away mode",
                "You seem to be away. Enable away mode to save energy and secure your home."
                    .to_string(),
            ),
            Locale::Fr => Message::new(
                "Activer le Mode Absence",
                "Vous semblez absent(e). Activez le Mode Absence pour économiser de l'énergie et sécuriser votre maison."
                    .to_string(),
            ),
        }
    }

    pub fn sensor_battery(self, count: usize, threshold_percent: f64) -> Message {
        match self {
            Locale::En => Message::new(
                "Sensors with low battery",
                format!(
                    "{} sensor(s) have a battery at or below {}%.",
                    count, threshold_percent
                ),
            ),
            Locale::Fr => Message::new(
                "Capteurs à batterie faible",
                format!(
                    "{} capteur(s) ont une batterie ≤ {}%.",
                    count, threshold_percent
                ),
            ),
        }
    }

    pub fn peak_hour(self) -> Message {
        match self {
            Locale::En => Message::new(
                "Peak hours",
                "Avoid running energy-hungry devices during peak hours to reduce costs."
                    .to_string(),
            ),
            Locale::Fr => Message::new(
                "Heure de pointe",
                "Évitez d'utiliser des appareils énergivores pendant les heures de pointe pour réduire les coûts."
                    .to_string(),
            ),
        }
    }

    pub fn switch_off(self, device_name: &str) -> String {
        match self {
            Locale::En => format!("Switch off {}", device_name),
            Locale::Fr => format!("Éteindre {}", device_name),
        }
    }

    pub fn view_alerts(self) -> String {
        match self {
            Locale::En => "View alerts".to_string(),
            Locale::Fr => "Voir les alertes".to_string(),
        }
    }

    pub fn enable_away_mode(self) -> String {
        match self {
            Locale::En => "Enable away mode".to_string(),
            Locale::Fr => "Activer le Mode Absence".to_string(),
        }
    }

    pub fn replace_battery(self, sensor_name: &str) -> String {
        match self {
            Locale::En => format!("Replace battery: {}", sensor_name),
            Locale::Fr => format!("Remplacer pile: {}", sensor_name),
        }
    }

    /// Shown when there is nothing to suggest.
    pub fn no_recommendations(self) -> &'static str {
        match self {
            Locale::En => "No recommendations at the moment.",
            Locale::Fr => "Aucune recommandation pour le moment.",
        }
    }
}
