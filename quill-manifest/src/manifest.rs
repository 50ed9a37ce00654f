use std::{path::Path, str::FromStr};

use quill_java::JavaFile;
use serde::Deserialize;

use crate::{
    Error, FileConfig, Result, TypeDecl, convert,
    validate::{self, ParseContext},
};

/// Source format of a manifest, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Toml,
    Json,
}

impl Format {
    /// `.json` files are JSON, everything else TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Root manifest for quill.toml
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// File options
    #[serde(default)]
    pub file: FileConfig,

    /// The top-level type
    #[serde(rename = "type")]
    pub type_decl: TypeDecl,
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "quill.toml", Format::Toml)
    }
}

impl Manifest {
    /// Parse a manifest file, TOML or JSON by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string(), Format::from_path(path))
    }

    /// Parse a manifest from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str, format: Format) -> Result<Self> {
        let manifest: Self = match format {
            Format::Toml => {
                toml::from_str(content).map_err(|e| Error::toml(e, content, filename))?
            }
            Format::Json => {
                serde_json::from_str(content).map_err(|e| Error::json(e, content, filename))?
            }
        };
        manifest.validate(content, filename)?;
        Ok(manifest)
    }

    /// Build the Java file the manifest describes
    pub fn java_file(&self) -> Result<JavaFile> {
        convert::java_file(&self.file, &self.type_decl)
            .map_err(|err| Error::declaration(format!("type '{}'", self.type_decl.name), err))
    }

    /// Validate the manifest after parsing
    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        let ctx = ParseContext::new(src, filename);
        validate::validate_file(&ctx, &self.file)?;
        validate::validate_type(&ctx, &self.type_decl)?;
        tracing::debug!(filename, ty = %self.type_decl.name, "validated manifest");
        Ok(())
    }
}
