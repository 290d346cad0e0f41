//! Upload fixtures resolved by path or alias.

use crate::dom::FileMeta;
use crate::error::{Result, TatError};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where an upload step takes its file from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Path relative to the fixture root (or absolute).
    Path(String),
    /// Name registered by an earlier alias step.
    Alias(String),
}

impl From<&str> for FileSource {
    /// `"@name"` is an alias, anything else a path.
    fn from(value: &str) -> Self {
        match value.strip_prefix('@') {
            Some(alias) => Self::Alias(alias.to_string()),
            None => Self::Path(value.to_string()),
        }
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Alias(alias) => write!(f, "@{}", alias),
        }
    }
}

/// Resolves fixture files for a single scenario run.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
    aliases: HashMap<String, String>,
}

impl FixtureStore {
    /// Store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            aliases: HashMap::new(),
        }
    }

    /// Store rooted at the fixtures shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Register `name` so `@name` resolves to `fixture`.
    pub fn alias(&mut self, name: &str, fixture: &str) -> Result<()> {
        let path = self.root.join(fixture);
        if !path.is_file() {
            return Err(TatError::FixtureNotFound { path });
        }
        self.aliases.insert(name.to_string(), fixture.to_string());
        Ok(())
    }

    /// Absolute path for a source.
    pub fn resolve(&self, source: &FileSource) -> Result<PathBuf> {
        let relative = match source {
            FileSource::Path(path) => path.as_str(),
            FileSource::Alias(name) => self
                .aliases
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| TatError::UnknownAlias(name.clone()))?,
        };
        let path = self.root.join(relative);
        if path.is_file() {
            Ok(path)
        } else {
            Err(TatError::FixtureNotFound { path })
        }
    }

    /// Read a fixture and describe it the way a file input would.
    pub fn load(&self, source: &FileSource) -> Result<FileMeta> {
        let path = self.resolve(source)?;
        let content = fs::read(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(FileMeta {
            mime_type: mime_for(&path).to_string(),
            size: content.len() as u64,
            digest: blake3::hash(&content).to_hex().to_string(),
            name,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => "application/json",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
