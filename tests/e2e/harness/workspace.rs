use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Temporary fixture root for upload scenarios.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    /// Create a fixture root holding the given files
    pub fn with_files(files: &[(&str, &[u8])]) -> Result<Self> {
        let dir = TempDir::new()?;
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
