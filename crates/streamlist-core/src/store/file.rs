use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::store::medium::{MediumError, StorageMedium};

const EXTENSION: &str = "json";

/// One file per key in a directory, bounded by a total byte quota
pub struct FileMedium {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileMedium {
    pub fn open(dir: &Path, quota_bytes: u64) -> Result<Self, MediumError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            quota_bytes,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are short identifiers; anything outside `[A-Za-z0-9_-]` is
    /// replaced so a key can never escape the directory
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }

    /// Bytes used by every stored key except `skip`
    fn used_bytes_except(&self, skip: &Path) -> Result<u64, MediumError> {
        let mut total = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path == skip || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            total += std::fs::metadata(&path)?.len();
        }
        Ok(total)
    }
}

fn map_write_error(err: std::io::Error) -> MediumError {
    if err.kind() == ErrorKind::StorageFull {
        MediumError::QuotaExceeded
    } else {
        MediumError::Io(err)
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let path = self.path_for(key);
        if self.used_bytes_except(&path)? + value.len() as u64 > self.quota_bytes {
            return Err(MediumError::QuotaExceeded);
        }

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value).map_err(map_write_error)?;
        std::fs::rename(&temp_path, &path)?;
        debug!("Stored {} ({} bytes) at {:?}", key, value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>, MediumError> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::open(dir.path(), 1024).unwrap();

        assert_eq!(medium.get("favorites").unwrap(), None);
        medium.set("favorites", "[1,2]").unwrap();
        assert_eq!(medium.get("favorites").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(medium.keys().unwrap(), vec!["favorites".to_string()]);

        medium.remove("favorites").unwrap();
        medium.remove("favorites").unwrap();
        assert_eq!(medium.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_quota_excludes_value_being_replaced() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::open(dir.path(), 10).unwrap();

        medium.set("a", "12345678").unwrap();
        medium.set("a", "87654321").unwrap();
        assert!(matches!(medium.set("b", "123"), Err(MediumError::QuotaExceeded)));
        assert_eq!(medium.get("b").unwrap(), None);
    }

    #[test]
    fn test_key_cannot_escape_directory() {
        let dir = TempDir::new().unwrap();
        let medium = FileMedium::open(dir.path(), 1024).unwrap();
        medium.set("../outside", "x").unwrap();
        assert!(dir.path().join("___outside.json").exists());
    }
}
