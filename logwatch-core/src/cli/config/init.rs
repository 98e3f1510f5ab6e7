use anyhow::{Context, Result, bail};
use rust_embed::RustEmbed;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "config-templates/"]
pub struct ConfigTemplates;

pub const TEMPLATE_NAME: &str = "logwatch.hcl";

pub fn init(path: PathBuf, force: bool) -> Result<()> {
    if path.is_dir() {
        bail!("{} is a directory", path.display());
    }
    if path.exists() && !force {
        bail!(
            "config file '{}' already exists (use --force to overwrite)",
            path.display()
        );
    }

    write_file(&path, &template(TEMPLATE_NAME)?)?;

    println!("✔ Wrote logwatch config to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  logwatch config check {}", path.display());
    println!("  logwatch watch --config {}", path.display());

    Ok(())
}

/// Fetch an embedded config template as UTF-8 text
pub fn template(name: &str) -> Result<String> {
    let file = ConfigTemplates::get(name)
        .with_context(|| format!("missing embedded config template: {name}"))?;

    let s =
        std::str::from_utf8(file.data.as_ref()).context("config template is not valid UTF-8")?;

    Ok(s.to_owned())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents.trim_start())
        .with_context(|| format!("failed to write {}", path.display()))
}
