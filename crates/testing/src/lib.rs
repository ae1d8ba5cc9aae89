//! Test-support helpers for building descriptor trees on disk.

use std::fs;
use std::path::{Path, PathBuf};

// this is a helper to materialize a fixture descriptor tree into a temp
// directory; fixtures live at the root of the repository under fixtures/
// example usage:
// ```rust,ignore
// let temp_dir = TempDir::new().expect("Failed to create temp directory");
// let tree = FixtureTree::new(temp_dir.path(), "sample-multimodule");
// let child_pom = tree.path("core/pom.xml");
// assert!(child_pom.exists());
// ```
pub struct FixtureTree {
    pub dir: PathBuf,
}

impl FixtureTree {
    pub fn new(dir: &Path, fixture_dir_name: &str) -> Self {
        let fixtures_path = fixtures_root().join(fixture_dir_name);
        copy_dir_all(&fixtures_path, dir).expect("Failed to copy fixture files");
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.join(relative)
    }
}

/// Write a descriptor file below `dir`, creating intermediate directories.
pub fn write_pom(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let target = dir.join(relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directories");
    }
    fs::write(&target, contents).expect("Failed to write fixture pom");
    target
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root")
        .join("fixtures")
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_dir_all(&entry.path(), &dst.join(entry.file_name()))?;
        } else {
            fs::copy(entry.path(), dst.join(entry.file_name()))?;
        }
    }
    Ok(())
}
