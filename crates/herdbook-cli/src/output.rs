//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use herdbook_core::{Animal, RepositoryError, StorageError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single animal
    pub fn print_animal(&self, animal: &Animal) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", animal.id);
                println!("Name:    {}", animal.name);
                println!("Age:     {}", animal.age);
                println!("Species: {}", animal.species);
            }
            OutputFormat::Json => {
                println!("{}", to_json(animal));
            }
            OutputFormat::Quiet => {
                println!("{}", animal.id);
            }
        }
    }

    /// Print a list of animals
    pub fn print_animals(&self, animals: &[Animal]) {
        match self.format {
            OutputFormat::Human => {
                if animals.is_empty() {
                    println!("No animals found.");
                    return;
                }
                println!("{:>5} | {:<24} | {:>4} | {}", "ID", "Name", "Age", "Species");
                println!("{}", "-".repeat(52));
                for animal in animals {
                    println!(
                        "{:>5} | {:<24} | {:>4} | {}",
                        animal.id,
                        truncate(&animal.name, 24),
                        animal.age,
                        truncate(&animal.species, 20)
                    );
                }
                println!("\n{} animal(s)", animals.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(animals));
            }
            OutputFormat::Quiet => {
                for animal in animals {
                    println!("{}", animal.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warn(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Print a recovery suggestion when a storage failure caused `err`
    pub fn recovery_hint(&self, err: &anyhow::Error) {
        if let Some(hint) = recovery_suggestion(err) {
            self.warn(hint);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// First recovery suggestion found along the error chain
fn recovery_suggestion(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<RepositoryError>() {
            err.recovery_suggestion()
        } else {
            cause
                .downcast_ref::<StorageError>()
                .and_then(StorageError::recovery_suggestion)
        }
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({"status": "error", "message": e.to_string()}).to_string()
    })
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("Zoë the llama", 6), "Zoë...");
    }

    #[test]
    fn test_recovery_suggestion_from_chain() {
        let disk_full = || StorageError::DiskFull {
            path: "/data/animals.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "No space left on device"),
        };

        let opened = anyhow::Error::new(disk_full()).context("Failed to open record file");
        assert_eq!(
            recovery_suggestion(&opened),
            Some("Free up disk space and try again.")
        );

        let created = anyhow::Error::new(RepositoryError::from(disk_full()))
            .context("Failed to create animal");
        assert_eq!(
            recovery_suggestion(&created),
            Some("Free up disk space and try again.")
        );

        let exhausted = anyhow::Error::new(RepositoryError::IdsExhausted);
        assert_eq!(recovery_suggestion(&exhausted), None);
        assert_eq!(recovery_suggestion(&anyhow::anyhow!("plain")), None);
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }
}
