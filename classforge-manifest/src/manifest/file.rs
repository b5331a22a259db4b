use std::path::{Path, PathBuf};

use super::ClassManifest;
use crate::Result;

/// Represents a class.toml file with both raw content and parsed manifest.
pub struct ClassToml {
    path: PathBuf,
    content: String,
    manifest: ClassManifest,
}

impl ClassToml {
    /// Open and parse a class.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(crate::Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = ClassManifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &ClassManifest {
        &self.manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reads_and_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class.toml");
        std::fs::write(&path, "[class]\nname = \"Player\"\n").unwrap();

        let file = ClassToml::open(&path).unwrap();
        assert_eq!(file.manifest().class_name(), "Player");
        assert_eq!(file.path(), path.as_path());
        assert!(file.content().contains("Player"));
    }
}
