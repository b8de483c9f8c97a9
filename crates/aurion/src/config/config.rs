use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use super::diagnostics::format_diagnostics;
use super::diagnostics::Diagnostic;
use super::diagnostics::Error;
use super::diagnostics::LoadError;
use super::diagnostics::MergeConflictLocation;
use super::diagnostics::SourceInfo;
use super::diagnostics::ValidationError;
use super::partial::PartialConfig;
use crate::advisor::Advisor;
use crate::advisor::Clock;
use crate::advisor::FixedClock;
use crate::advisor::Hour;
use crate::advisor::SystemClock;
use crate::locale::Locale;

pub const DEFAULT_LISTEN: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8565;

#[derive(Debug, Default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub advisor: AdvisorConfig,
    pub api: ApiConfig,
}

// LogLevel needs Deserialize because it's used in PartialLoggingConfig with toml::Spanned
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,

    /// Per-target levels, e.g. `"aurion::api" = "debug"`
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Target filter for the tracing subscriber.
    pub fn targets(&self) -> Targets {
        self.overrides.iter().fold(
            Targets::new().with_default(LevelFilter::from(self.level)),
            |targets, (target, level)| {
                targets.with_target(target.clone(), LevelFilter::from(*level))
            },
        )
    }
}

#[derive(Debug, Default)]
pub struct AdvisorConfig {
    pub locale: Locale,

    /// Evaluate at this hour instead of reading the wall clock
    pub fixed_hour: Option<Hour>,
}

/// Clock selected by configuration.
pub type ConfiguredClock = Box<dyn Clock + Send + Sync>;

impl AdvisorConfig {
    pub fn build(&self) -> Advisor<ConfiguredClock> {
        let clock: ConfiguredClock = match self.fixed_hour {
            Some(hour) => Box::new(FixedClock(hour)),
            None => Box::new(SystemClock),
        };
        Advisor::with_clock(clock).with_locale(self.locale)
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    pub listen: IpAddr,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Formatted report of every error found
    #[error("{0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from one or more TOML files
    ///
    /// Supports imports within config files, reports conflicting definitions
    /// across all sources, and validates every field. Warnings are returned
    /// alongside the config; any error fails the whole load with a report of
    /// all of them.
    pub fn from_files(paths: &[PathBuf]) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        let configs = PartialConfig::load_with_imports(paths)?;
        let (partial, diagnostics) = PartialConfig::merge(configs);
        Self::from_partial(partial, diagnostics)
    }

    /// Convert a merged PartialConfig to a Config, validating all fields
    pub fn from_partial(
        partial: PartialConfig,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        let PartialConfig {
            logging: partial_logging,
            advisor: partial_advisor,
            api: partial_api,
            origins,
            ..
        } = partial;

        let logging = match partial_logging {
            Some(partial_logging) => LoggingConfig {
                level: partial_logging
                    .level
                    .map(|s| *s.get_ref())
                    .unwrap_or_default(),
                overrides: partial_logging
                    .overrides
                    .map(|hm| hm.into_iter().map(|(k, v)| (k, *v.get_ref())).collect())
                    .unwrap_or_default(),
            },
            None => LoggingConfig::default(),
        };

        let mut advisor = AdvisorConfig::default();
        if let Some(partial_advisor) = partial_advisor {
            if let Some(locale) = partial_advisor.locale {
                advisor.locale = locale.into_inner();
            }

            if let Some(fixed_hour) = partial_advisor.fixed_hour {
                let value = *fixed_hour.get_ref();
                match u8::try_from(value).ok().and_then(|h| Hour::new(h).ok()) {
                    Some(hour) => advisor.fixed_hour = Some(hour),
                    None => diagnostics.push(invalid(
                        &origins,
                        "advisor.fixed_hour",
                        format!("fixed_hour must be between 0 and 23, got {}", value),
                    )),
                }
            }
        }

        let mut api = ApiConfig::default();
        if let Some(partial_api) = partial_api {
            if let Some(listen) = partial_api.listen {
                match listen.get_ref().parse::<IpAddr>() {
                    Ok(addr) => api.listen = addr,
                    Err(_) => diagnostics.push(invalid(
                        &origins,
                        "api.listen",
                        format!("'{}' is not an IP address", listen.get_ref()),
                    )),
                }
            }

            if let Some(port) = partial_api.port {
                api.port = port.into_inner();
            }
        }

        if diagnostics.iter().any(|d| d.is_error()) {
            return Err(ConfigError::Invalid(format_diagnostics(&diagnostics)));
        }

        Ok((
            Config {
                logging,
                advisor,
                api,
            },
            diagnostics,
        ))
    }
}

/// Validation error pointing at where `field_path` was defined
fn invalid(
    origins: &HashMap<String, MergeConflictLocation>,
    field_path: &str,
    message: String,
) -> Diagnostic {
    let origin = origins.get(field_path);
    Diagnostic::Error(Error::Validation(ValidationError {
        field_path: field_path.to_string(),
        message,
        span: origin.map(|loc| loc.span.clone()),
        source: origin.map(|loc| SourceInfo {
            file_path: loc.file_path.clone(),
            content: loc.content.clone(),
        }),
    }))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use tracing::Level;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_merge_non_overlapping_configs() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "base.toml",
            r#"
[logging]
level = "info"

[advisor]
locale = "fr"
"#,
        );
        let extra = write(
            &dir,
            "extra.toml",
            r#"
[logging.overrides]
"aurion::api" = "debug"

[api]
port = 9000
"#,
        );

        let (config, diagnostics) = Config::from_files(&[base, extra]).unwrap();
        assert!(diagnostics.is_empty(), "Expected no diagnostics");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(
            config.logging.overrides.get("aurion::api"),
            Some(&LogLevel::Debug)
        );
        assert_eq!(config.advisor.locale, Locale::Fr);
        assert_eq!(config.advisor.fixed_hour, None);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.listen.to_string(), DEFAULT_LISTEN);
    }

    #[test]
    fn test_conflict_detection() {
        let dir = TempDir::new().unwrap();
        let base = write(&dir, "base.toml", "[logging]\nlevel = \"info\"\n");
        let conflict = write(&dir, "conflict.toml", "[logging]\nlevel = \"debug\"\n");

        let err = Config::from_files(&[base, conflict]).unwrap_err().to_string();
        assert!(err.contains("Merge conflict"));
        assert!(err.contains("logging.level"));
    }

    #[test]
    fn test_multiple_conflicts_reported() {
        let dir = TempDir::new().unwrap();
        let base = write(
            &dir,
            "base.toml",
            r#"
[logging.overrides]
"target1" = "trace"

[advisor]
fixed_hour = 10

[api]
port = 8000
"#,
        );
        let conflict = write(
            &dir,
            "conflict.toml",
            r#"
[logging.overrides]
"target1" = "error"

[advisor]
fixed_hour = 11

[api]
port = 8001
"#,
        );

        let err = Config::from_files(&[base, conflict]).unwrap_err().to_string();
        assert!(err.contains("logging.overrides.target1"));
        assert!(err.contains("advisor.fixed_hour"));
        assert!(err.contains("api.port"));
    }

    #[test]
    fn test_import_resolution() {
        let dir = TempDir::new().unwrap();
        write(&dir, "configs/base.toml", "[advisor]\nfixed_hour = 19\n");
        let main = write(
            &dir,
            "main.toml",
            "imports = [\"configs/base.toml\"]\n\n[logging]\nlevel = \"warn\"\n",
        );

        let (config, _) = Config::from_files(&[main]).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.advisor.fixed_hour, Some(Hour::new(19).unwrap()));
        assert_eq!(config.advisor.build().hour().get(), 19);
    }

    #[test]
    fn test_shared_import_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        write(&dir, "common.toml", "[logging]\nlevel = \"warn\"\n");
        write(
            &dir,
            "a.toml",
            "imports = [\"common.toml\"]\n\n[advisor]\nlocale = \"fr\"\n",
        );
        write(
            &dir,
            "b.toml",
            "imports = [\"common.toml\"]\n\n[api]\nport = 9000\n",
        );
        let main = write(&dir, "main.toml", "imports = [\"a.toml\", \"b.toml\"]\n");

        let (config, diagnostics) = Config::from_files(&[main]).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.advisor.locale, Locale::Fr);
        assert_eq!(config.api.port, 9000);
    }

    #[test]
    fn test_import_cycle_detection() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.toml", "imports = [\"b.toml\"]\n");
        write(&dir, "b.toml", "imports = [\"a.toml\"]\n");

        let err = Config::from_files(&[a]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Load(LoadError::ImportCycle { .. })
        ));
    }

    #[test]
    fn test_empty_config_file_warns() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.toml", "");

        let (config, diagnostics) = Config::from_files(&[empty]).unwrap();
        assert_eq!(diagnostics.len(), 1, "Expected 1 warning for empty config");
        assert!(diagnostics[0].is_warning());
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.api.port, DEFAULT_PORT);
    }

    #[test]
    fn test_fixed_hour_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "hour.toml", "[advisor]\nfixed_hour = 24\n");

        match Config::from_files(&[path]).unwrap_err() {
            ConfigError::Invalid(report) => assert!(report.contains("advisor.fixed_hour")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_listen_must_be_an_address() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "api.toml", "[api]\nlisten = \"localhost\"\n");

        let err = Config::from_files(&[path]).unwrap_err().to_string();
        assert!(err.contains("api.listen"));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "typo.toml", "[advisor]\nlocal = \"fr\"\n");

        let err = Config::from_files(&[path]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(LoadError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_error() {
        let missing = PathBuf::from("/nonexistent/aurion.toml");

        let err = Config::from_files(&[missing]).unwrap_err().to_string();
        assert!(err.contains("Failed to read"), "Error should mention read failure");
        assert!(err.contains("/nonexistent/aurion.toml"));
    }

    #[test]
    fn test_logging_targets() {
        let logging = LoggingConfig {
            level: LogLevel::Warn,
            overrides: HashMap::from([("aurion::api".to_string(), LogLevel::Debug)]),
        };
        let targets = logging.targets();

        assert!(targets.would_enable("aurion::api", &Level::DEBUG));
        assert!(!targets.would_enable("aurion::actions", &Level::INFO));
        assert!(targets.would_enable("aurion::actions", &Level::WARN));
    }
}
