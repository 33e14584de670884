//! Capture files in a directory on disk

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ports::{CaptureStore, StorageError};
use crate::domain::config::CollisionPolicy;
use crate::domain::recording::CaptureFileName;

/// Write-buffer size for capture files
const WRITE_BUFFER_BYTES: usize = 64 * 1024;

/// Highest `_N` suffix tried before giving up on a free name
const MAX_UNIQUE_SUFFIX: u32 = 999;

/// Stores captures as `<dir>/sample_<HH_MM_SS>.pcm`
#[derive(Debug, Clone)]
pub struct MusicDirStore {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl MusicDirStore {
    pub fn new(dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    fn create_new(path: &Path) -> io::Result<File> {
        OpenOptions::new().write(true).create_new(true).open(path)
    }

    fn create_error(path: &Path, e: io::Error) -> StorageError {
        StorageError::Create {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    }

    fn open_unique(&self, name: &CaptureFileName) -> Result<(PathBuf, File), StorageError> {
        for n in 0..=MAX_UNIQUE_SUFFIX {
            let candidate = if n == 0 {
                name.clone()
            } else {
                name.with_suffix(n)
            };
            let path = self.dir.join(candidate.file_name());

            match Self::create_new(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Self::create_error(&path, e)),
            }
        }

        Err(StorageError::AlreadyExists(
            self.dir.join(name.file_name()).display().to_string(),
        ))
    }
}

impl CaptureStore for MusicDirStore {
    type Writer = BufWriter<File>;

    fn create(&self, name: &CaptureFileName) -> Result<(PathBuf, Self::Writer), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::CreateDir {
            path: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let (path, file) = match self.policy {
            CollisionPolicy::Uniquify => self.open_unique(name)?,
            CollisionPolicy::Overwrite => {
                let path = self.dir.join(name.file_name());
                let file = File::create(&path).map_err(|e| Self::create_error(&path, e))?;
                (path, file)
            }
            CollisionPolicy::Fail => {
                let path = self.dir.join(name.file_name());
                match Self::create_new(&path) {
                    Ok(file) => (path, file),
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                        return Err(StorageError::AlreadyExists(path.display().to_string()))
                    }
                    Err(e) => return Err(Self::create_error(&path, e)),
                }
            }
        };

        debug!("Created capture file {}", path.display());
        Ok((path, BufWriter::with_capacity(WRITE_BUFFER_BYTES, file)))
    }

    fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }

    fn location(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::TempDir;

    fn name() -> CaptureFileName {
        CaptureFileName::at(&Utc.with_ymd_and_hms(2024, 1, 2, 13, 14, 15).unwrap())
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("music");
        let store = MusicDirStore::new(&dir, CollisionPolicy::Uniquify);

        let (path, mut writer) = store.create(&name()).unwrap();
        writer.write_all(&[1, 2]).unwrap();
        writer.flush().unwrap();

        assert_eq!(path, dir.join("sample_13_14_15.pcm"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2]);
        assert_eq!(store.location(), dir.as_path());
    }

    #[test]
    fn uniquify_appends_suffix() {
        let tmp = TempDir::new().unwrap();
        let store = MusicDirStore::new(tmp.path(), CollisionPolicy::Uniquify);

        let (first, _) = store.create(&name()).unwrap();
        let (second, _) = store.create(&name()).unwrap();
        let (third, _) = store.create(&name()).unwrap();

        assert_eq!(first.file_name().unwrap(), "sample_13_14_15.pcm");
        assert_eq!(second.file_name().unwrap(), "sample_13_14_15_1.pcm");
        assert_eq!(third.file_name().unwrap(), "sample_13_14_15_2.pcm");
    }

    #[test]
    fn overwrite_truncates_existing() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("sample_13_14_15.pcm");
        fs::write(&existing, [9u8; 10]).unwrap();
        let store = MusicDirStore::new(tmp.path(), CollisionPolicy::Overwrite);

        let (path, writer) = store.create(&name()).unwrap();
        drop(writer);

        assert_eq!(path, existing);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn fail_rejects_existing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("sample_13_14_15.pcm"), b"").unwrap();
        let store = MusicDirStore::new(tmp.path(), CollisionPolicy::Fail);

        let err = store.create(&name()).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[test]
    fn unusable_directory_is_reported() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();
        let store = MusicDirStore::new(blocker.join("music"), CollisionPolicy::Uniquify);

        let err = store.create(&name()).unwrap_err();
        assert!(matches!(err, StorageError::CreateDir { .. }));
    }

    #[test]
    fn discard_removes_file() {
        let tmp = TempDir::new().unwrap();
        let store = MusicDirStore::new(tmp.path(), CollisionPolicy::Uniquify);
        let (path, writer) = store.create(&name()).unwrap();
        drop(writer);

        store.discard(&path);
        assert!(!path.exists());
        // second discard is harmless
        store.discard(&path);
    }
}
