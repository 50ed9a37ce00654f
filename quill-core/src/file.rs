use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// Trait for types that render to a file on disk
pub trait GeneratedFile {
    /// Get the file path relative to the base directory
    fn path(&self, base: &Path) -> PathBuf;

    /// Get the rules for writing this file
    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    /// Render the file content
    fn render(&self) -> String;

    /// Write the file to disk
    fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.path(base);

        match self.rules().overwrite {
            Overwrite::Always => {
                write_file(&path, &self.render())?;
                Ok(WriteResult::Written(path))
            }
            Overwrite::IfMissing => {
                if path.exists() {
                    Ok(WriteResult::Skipped(path))
                } else {
                    write_file(&path, &self.render())?;
                    Ok(WriteResult::Written(path))
                }
            }
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write '{}'", path.display()))
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written(PathBuf),
    /// File was skipped (already exists)
    Skipped(PathBuf),
}

impl WriteResult {
    /// The path that was written or skipped.
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Skipped(path) => path,
        }
    }
}

/// Already-rendered content destined for a path
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: always overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Set the write rules.
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl GeneratedFile for File {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.path)
    }

    fn rules(&self) -> FileRules {
        self.rules.clone()
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    pub overwrite: Overwrite,
}

impl FileRules {
    /// Rules for files that must never clobber an existing file.
    pub fn if_missing() -> Self {
        Self {
            overwrite: Overwrite::IfMissing,
        }
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Always overwrite (generated code)
    #[default]
    Always,
    /// Only create if file doesn't exist
    IfMissing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new("com/example/Foo.java", "class Foo {}\n");

        let result = file.write(dir.path()).unwrap();
        let expected = dir.path().join("com/example/Foo.java");

        assert_eq!(result, WriteResult::Written(expected.clone()));
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "class Foo {}\n");
    }

    #[test]
    fn test_if_missing_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foo.java"), "original").unwrap();

        let file = File::new("Foo.java", "replacement").with_rules(FileRules::if_missing());
        let result = file.write(dir.path()).unwrap();

        assert!(matches!(result, WriteResult::Skipped(_)));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Foo.java")).unwrap(),
            "original"
        );
    }
}
