use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use quill_manifest::Manifest;

use super::UnwrapOrExit;

#[derive(Args)]
pub struct CheckCommand {
    /// Path to the manifest (defaults to ./quill.toml)
    #[arg(short, long, default_value = "quill.toml")]
    pub manifest: PathBuf,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.manifest).unwrap_or_exit();
        let file = manifest.java_file().unwrap_or_exit();

        println!("✓ {} is valid", self.manifest.display());
        println!("  type: {}", file.class_name());

        let imports = file.imports();
        if imports.is_empty() {
            println!("  imports: none");
            return Ok(());
        }
        println!("  imports:");
        for declaration in imports.declarations() {
            println!("    {declaration}");
        }
        Ok(())
    }
}
