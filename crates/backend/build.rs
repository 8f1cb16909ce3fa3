//! Places the workspace `config.toml` next to the `vendor-summary` binary.

use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let source = manifest_dir.join("../../config.toml");
    println!("cargo:rerun-if-changed={}", source.display());

    if !source.exists() {
        println!("cargo:warning=no workspace config.toml, the binary uses its embedded default");
        return Ok(());
    }

    // OUT_DIR is target/<profile>/build/<pkg>-<hash>/out; the binary sits in target/<profile>
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let Some(bin_dir) = out_dir.ancestors().nth(3) else {
        return Err(format!("unexpected OUT_DIR layout: {}", out_dir.display()).into());
    };

    std::fs::copy(&source, bin_dir.join("config.toml"))?;
    Ok(())
}
