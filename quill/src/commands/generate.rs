use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result};
use quill_core::{File, FileRules, GeneratedFile, WriteResult};
use quill_java::JavaFile;
use quill_manifest::Manifest;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to the manifest (defaults to ./quill.toml)
    #[arg(short, long, default_value = "quill.toml")]
    pub manifest: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Print the generated source instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Leave an existing file untouched
    #[arg(long)]
    pub keep_existing: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.manifest).unwrap_or_exit();
        let file = manifest.java_file().unwrap_or_exit();
        tracing::debug!(manifest = %self.manifest.display(), class = %file.class_name(), "loaded manifest");

        if self.dry_run {
            print!("{}", file.render());
            return Ok(());
        }

        let result = self
            .write(&file)
            .wrap_err_with(|| format!("failed to generate {}", file.class_name()))?;
        match result {
            WriteResult::Written(path) => println!("Generated: {}", path.display()),
            WriteResult::Skipped(path) => println!("Skipped (exists): {}", path.display()),
        }
        Ok(())
    }

    fn write(&self, file: &JavaFile) -> Result<WriteResult> {
        if !self.keep_existing {
            return file.write_to_dir(&self.output);
        }
        let relative = file.path(Path::new(""));
        File::new(relative, file.render())
            .with_rules(FileRules::if_missing())
            .write(&self.output)
    }
}
