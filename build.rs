//! Bakes the built-in model descriptors under `assets/models/` into a fixed
//! table of byte buffers, included by `src/catalog.rs`. Entries are ordered
//! by filename so catalog indices stay stable across builds.

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let models_dir = Path::new(&manifest_dir).join("assets").join("models");

    let mut names: Vec<String> = fs::read_dir(&models_dir)
        .expect("assets/models/ missing")
        .filter_map(|entry| {
            let path = entry.expect("unreadable dir entry").path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => Some(
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .expect("non-UTF8 model filename")
                        .to_owned(),
                ),
                _ => None,
            }
        })
        .collect();
    names.sort();

    let out_path = Path::new(&env::var("OUT_DIR").expect("OUT_DIR not set")).join("catalog_data.rs");
    let mut out = fs::File::create(&out_path).expect("cannot create catalog_data.rs");

    writeln!(out, "static MODELS: [&[u8]; {}] = [", names.len()).unwrap();
    for name in &names {
        writeln!(
            out,
            "    include_bytes!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/assets/models/{}\")),",
            name
        )
        .unwrap();
    }
    writeln!(out, "];").unwrap();

    println!("cargo:rerun-if-changed=assets/models");
}
