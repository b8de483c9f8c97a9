use std::ops::Range;
use std::path::PathBuf;

/// Source information for where a diagnostic came from
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub file_path: PathBuf,
    pub content: String,
}

/// A diagnostic message that can be either a warning or an error
#[derive(Debug, Clone)]
pub enum Diagnostic {
    Warning(Warning),
    Error(Error),
}

/// Warning messages that don't prevent config loading
#[derive(Debug, Clone)]
pub enum Warning {
    EmptyConfig { file_path: PathBuf },
}

/// Error messages that indicate problems with the config
#[derive(Debug, Clone)]
pub enum Error {
    Merge(MergeError),
    Validation(ValidationError),
}

/// The same field set by more than one file
#[derive(Debug, Clone)]
pub struct MergeError {
    pub field_path: String,
    pub message: String,
    pub conflicts: Vec<MergeConflictLocation>,
}

/// Where a field was set: file, byte span and file content
#[derive(Debug, Clone)]
pub struct MergeConflictLocation {
    pub file_path: PathBuf,
    pub span: Range<usize>,
    pub content: String,
}

/// A field whose value is well-formed TOML but not acceptable
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field_path: String,
    pub message: String,
    pub span: Option<Range<usize>>,
    pub source: Option<SourceInfo>,
}

/// Failure to load a config file at all
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {}", path.display(), error)]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse '{}': {}", path.display(), error)]
    Parse {
        path: PathBuf,
        #[source]
        error: toml::de::Error,
    },

    #[error("Import cycle detected at '{}': involves {} file(s)", path.display(), cycle.len())]
    ImportCycle { path: PathBuf, cycle: Vec<PathBuf> },
}

impl Diagnostic {
    /// Returns true if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    /// Returns true if this diagnostic is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::Warning(_))
    }
}

/// Format all diagnostics for display using Ariadne
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    use ariadne::Color;
    use ariadne::Label;
    use ariadne::Report;
    use ariadne::ReportKind;

    let mut output = Vec::new();

    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::Warning(Warning::EmptyConfig { file_path }) => {
                output.extend_from_slice(
                    format!(
                        "Warning: Config file '{}' is empty and has no effect\n",
                        file_path.display()
                    )
                    .as_bytes(),
                );
            }
            Diagnostic::Error(Error::Merge(merge_error)) => {
                let Some(first_conflict) = merge_error.conflicts.first() else {
                    output.extend_from_slice(
                        format!("Merge conflict in field '{}'\n", merge_error.field_path).as_bytes(),
                    );
                    continue;
                };

                let mut report = Report::build(
                    ReportKind::Error,
                    (file_id(&first_conflict.file_path), first_conflict.span.clone()),
                )
                .with_message(format!(
                    "Merge conflict in field '{}'",
                    merge_error.field_path
                ))
                .with_note(&merge_error.message);

                for (idx, conflict) in merge_error.conflicts.iter().enumerate() {
                    let label_msg = if idx == 0 {
                        "first definition here"
                    } else {
                        "conflicts with this definition"
                    };

                    report = report.with_label(
                        Label::new((file_id(&conflict.file_path), conflict.span.clone()))
                            .with_message(label_msg)
                            .with_color(if idx == 0 { Color::Red } else { Color::Yellow }),
                    );
                }

                // One cache holding every file involved in the conflict
                let mut files: Vec<(String, String)> = Vec::new();
                for conflict in &merge_error.conflicts {
                    let id = file_id(&conflict.file_path);
                    if !files.iter().any(|(existing, _)| *existing == id) {
                        files.push((id, conflict.content.clone()));
                    }
                }

                report
                    .finish()
                    .write(ariadne::sources(files), &mut output)
                    .ok();
            }
            Diagnostic::Error(Error::Validation(validation_error)) => {
                match (&validation_error.span, &validation_error.source) {
                    (Some(span), Some(source)) => {
                        let id = file_id(&source.file_path);
                        Report::build(ReportKind::Error, (id.clone(), span.clone()))
                            .with_message(format!(
                                "Validation error in '{}'",
                                validation_error.field_path
                            ))
                            .with_label(
                                Label::new((id.clone(), span.clone()))
                                    .with_message(&validation_error.message)
                                    .with_color(Color::Red),
                            )
                            .finish()
                            .write(
                                ariadne::sources(vec![(id, source.content.clone())]),
                                &mut output,
                            )
                            .ok();
                    }
                    _ => {
                        output.extend_from_slice(
                            format!(
                                "Validation error in '{}': {}\n",
                                validation_error.field_path, validation_error.message
                            )
                            .as_bytes(),
                        );
                    }
                }
            }
        }
    }

    String::from_utf8_lossy(&output).to_string()
}

fn file_id(path: &std::path::Path) -> String {
    path.to_string_lossy().to_string()
}
