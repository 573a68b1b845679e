//! Generates the C header for the exported `carve_*` functions.
//!
//! The header lands in `include/` unless `CARVE_HEADER_DIR` names another
//! directory.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "carve.h";

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let header_dir = env::var_os("CARVE_HEADER_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest_dir.join("include"));

    let config = cbindgen::Config::from_file(manifest_dir.join("cbindgen.toml"))?;
    fs::create_dir_all(&header_dir)?;

    let bindings = cbindgen::Builder::new()
        .with_crate(&manifest_dir)
        .with_config(config)
        .generate()?;
    // Returns whether the file changed; an identical header is left alone.
    bindings.write_to_file(header_dir.join(HEADER));

    for input in ["src", "cbindgen.toml"] {
        println!("cargo:rerun-if-changed={input}");
    }
    println!("cargo:rerun-if-env-changed=CARVE_HEADER_DIR");
    Ok(())
}
