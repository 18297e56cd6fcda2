use std::path::PathBuf;
use std::sync::OnceLock;

/// Returns the workspace root directory.
/// Works by walking up from the crate's manifest directory.
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .expect("crate manifest has no parent directory")
        .to_path_buf()
}

/// Returns the path to a file inside the workspace `test_output/` directory,
/// creating the directory on first use.
pub fn test_output_path(name: &str) -> PathBuf {
    static INIT: OnceLock<PathBuf> = OnceLock::new();
    let dir = INIT.get_or_init(|| {
        let dir = workspace_root().join("test_output");
        std::fs::create_dir_all(&dir).expect("Failed to create test_output directory");
        dir
    });
    dir.join(name)
}
