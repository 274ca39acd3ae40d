use std::fs;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"),
    );
    let workspace_root = manifest_dir
        .ancestors()
        .nth(2)
        .expect("rice-vision-app lives at crates/rice-vision-app");
    let version_path = workspace_root.join("VERSION");

    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .unwrap_or_else(|error| panic!("read {}: {error}", version_path.display()));
    let version = version.trim();
    assert!(
        !version.is_empty(),
        "rice-vision VERSION file is empty; the CLI prints it for `rice-vision version`"
    );

    println!("cargo:rustc-env=RICE_VISION_VERSION={version}");
}
