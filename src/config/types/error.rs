//! Configuration error types.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // no #[from]: a source() would print the diagnostics twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

// ============================================================================
// Diagnostics
// ============================================================================

/// One rejected config value.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}: {}", "×".red(), self.field.key().cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({} {})", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Validation errors from every section, reported in one go.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Grouped under a `[section]` header, sections in first-seen order.
impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = match self.len() {
            1 => "1 error".to_string(),
            n => format!("{n} errors"),
        };
        write!(f, "{} ({count})", "invalid routegen.toml".red().bold())?;

        let mut sections: Vec<&str> = Vec::new();
        for err in &self.errors {
            if !sections.contains(&err.field.section()) {
                sections.push(err.field.section());
            }
        }

        for section in sections {
            write!(f, "\n{}", format!("[{section}]").dimmed())?;
            for err in self.errors.iter().filter(|e| e.field.section() == section) {
                write!(f, "\n{err}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("routegen.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("routegen.toml"));
    }

    #[test]
    fn test_display_groups_by_section() {
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("routes", "layout"), "bad layout");
        diag.error(FieldPath::new("meta", "source"), "unsupported");
        diag.error_with_hint(FieldPath::new("routes", "extensions"), "bad ext", "use \".vue\"");

        let display = diag.to_string();
        let routes = display.find("[routes]").unwrap();
        let meta = display.find("[meta]").unwrap();
        assert!(routes < meta);
        // both routes errors sit under the one header
        assert!(display.find("bad ext").unwrap() < meta);
        assert!(display.contains("use \".vue\""));
        assert_eq!(display.matches("[routes]").count(), 1);
        assert!(display.contains("(3 errors)"));
    }

    #[test]
    fn test_into_result() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());

        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("meta", "source"), "unsupported");
        assert_eq!(diag.into_result().unwrap_err().len(), 1);
    }
}
