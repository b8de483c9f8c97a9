use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use toml::Spanned;

use super::diagnostics::Diagnostic;
use super::diagnostics::Error;
use super::diagnostics::LoadError;
use super::diagnostics::MergeConflictLocation;
use super::diagnostics::MergeError;
use super::diagnostics::SourceInfo;
use super::diagnostics::Warning;
use super::LogLevel;
use crate::locale::Locale;

/// One config file as written, every field optional and spanned.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default)]
    pub imports: Vec<String>,

    pub logging: Option<PartialLoggingConfig>,
    pub advisor: Option<PartialAdvisorConfig>,
    pub api: Option<PartialApiConfig>,

    /// Source information for error reporting (not serialized)
    #[serde(skip)]
    pub source: Option<SourceInfo>,

    /// After merging: where each kept field was defined, keyed by field path
    #[serde(skip)]
    pub origins: HashMap<String, MergeConflictLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialLoggingConfig {
    pub level: Option<Spanned<LogLevel>>,
    pub overrides: Option<HashMap<String, Spanned<LogLevel>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialAdvisorConfig {
    pub locale: Option<Spanned<Locale>>,
    /// Kept wide so out-of-range values reach validation with their span
    pub fixed_hour: Option<Spanned<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialApiConfig {
    pub listen: Option<Spanned<String>>,
    pub port: Option<Spanned<u16>>,
}

impl PartialConfig {
    /// Load a single config file without processing imports
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut config: PartialConfig = toml::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            error: e,
        })?;

        config.source = Some(SourceInfo {
            file_path: path.to_path_buf(),
            content,
        });

        Ok(config)
    }

    /// Load config files with import resolution
    ///
    /// Each config file is loaded, then its imports are recursively processed.
    /// Returns all loaded configs in order (imports first, then parent).
    pub fn load_with_imports(paths: &[PathBuf]) -> Result<Vec<Self>, LoadError> {
        let mut visited = HashSet::new();
        let mut loaded = HashSet::new();
        let mut all_configs = Vec::new();

        for path in paths {
            Self::load_recursive(path, &mut visited, &mut loaded, &mut all_configs)?;
        }

        Ok(all_configs)
    }

    fn load_recursive(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        loaded: &mut HashSet<PathBuf>,
        configs: &mut Vec<Self>,
    ) -> Result<(), LoadError> {
        let canonical_path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if visited.contains(&canonical_path) {
            return Err(LoadError::ImportCycle {
                path: canonical_path.clone(),
                cycle: visited.iter().cloned().collect(),
            });
        }

        // Reached again through another import branch
        if loaded.contains(&canonical_path) {
            return Ok(());
        }

        visited.insert(canonical_path.clone());

        let config = Self::from_file(path)?;

        // Imports are resolved relative to the importing file
        for import_path in &config.imports {
            let import_path_buf = PathBuf::from(import_path);
            let resolved_path = if import_path_buf.is_absolute() {
                import_path_buf
            } else {
                let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
                parent_dir.join(import_path_buf)
            };

            Self::load_recursive(&resolved_path, visited, loaded, configs)?;
        }

        configs.push(config);

        // `visited` only tracks the current import chain
        visited.remove(&canonical_path);
        loaded.insert(canonical_path);

        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.logging.is_none()
            && self.advisor.is_none()
            && self.api.is_none()
            && self.imports.is_empty()
    }

    /// Merge multiple partial configs together
    ///
    /// First-wins: the first definition of a field is kept. Every later
    /// definition is reported as a conflict, and merging carries on so that
    /// all conflicts are reported at once.
    pub fn merge<I>(configs: I) -> (Self, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = Self>,
    {
        let mut result = PartialConfig::default();
        let mut merger = Merger::default();

        for config in configs {
            result.imports.extend(config.imports.iter().cloned());

            let source = config.source.clone().unwrap_or_else(|| SourceInfo {
                file_path: PathBuf::from("<unknown>"),
                content: String::new(),
            });

            if config.is_empty() {
                merger.diagnostics.push(Diagnostic::Warning(Warning::EmptyConfig {
                    file_path: source.file_path.clone(),
                }));
            }

            if let Some(logging) = config.logging {
                let target = result.logging.get_or_insert_with(Default::default);
                merger.field("logging.level", &mut target.level, logging.level, &source);

                if let Some(overrides) = logging.overrides {
                    let target_overrides = target.overrides.get_or_insert_with(HashMap::new);
                    for (key, value) in overrides {
                        let path = format!("logging.overrides.{}", key);
                        if let Some(loc) = merger.claim(&path, value.span(), &source) {
                            target_overrides.insert(key, value);
                            merger.origins.insert(path, loc);
                        }
                    }
                }
            }

            if let Some(advisor) = config.advisor {
                let target = result.advisor.get_or_insert_with(Default::default);
                merger.field("advisor.locale", &mut target.locale, advisor.locale, &source);
                merger.field(
                    "advisor.fixed_hour",
                    &mut target.fixed_hour,
                    advisor.fixed_hour,
                    &source,
                );
            }

            if let Some(api) = config.api {
                let target = result.api.get_or_insert_with(Default::default);
                merger.field("api.listen", &mut target.listen, api.listen, &source);
                merger.field("api.port", &mut target.port, api.port, &source);
            }
        }

        result.origins = merger.origins;
        (result, merger.diagnostics)
    }
}

#[derive(Default)]
struct Merger {
    diagnostics: Vec<Diagnostic>,
    origins: HashMap<String, MergeConflictLocation>,
}

impl Merger {
    /// Record a definition of `path`. Returns its location if it is the
    /// first one, otherwise reports the conflict and returns `None`.
    fn claim(
        &mut self,
        path: &str,
        span: std::ops::Range<usize>,
        source: &SourceInfo,
    ) -> Option<MergeConflictLocation> {
        let loc = MergeConflictLocation {
            file_path: source.file_path.clone(),
            span,
            content: source.content.clone(),
        };

        match self.origins.get(path) {
            Some(prev) => {
                self.diagnostics.push(Diagnostic::Error(Error::Merge(MergeError {
                    field_path: path.to_string(),
                    message: format!("'{}' defined in multiple config files", path),
                    conflicts: vec![prev.clone(), loc],
                })));
                None
            }
            None => Some(loc),
        }
    }

    fn field<T>(
        &mut self,
        path: &str,
        target: &mut Option<Spanned<T>>,
        incoming: Option<Spanned<T>>,
        source: &SourceInfo,
    ) {
        let Some(value) = incoming else {
            return;
        };

        if let Some(loc) = self.claim(path, value.span(), source) {
            *target = Some(value);
            self.origins.insert(path.to_string(), loc);
        }
    }
}
