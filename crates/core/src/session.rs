//! On-disk session profiles: opaque per-identifier browser profile
//! directories plus the exported QR image, with create/reset/list semantics.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, WaError};

/// Outcome of a reset, distinct so callers can report them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Session data was removed; `removed_qr_image` says whether the
    /// exported challenge image was also found and deleted.
    Cleared { removed_qr_image: bool },
    /// There was nothing on disk to remove.
    NothingToClear,
}

/// Filesystem layout for session profiles. The profile directory contents
/// belong entirely to the browser; this store only creates and deletes them.
pub struct SessionStore {
    root: PathBuf,
    qr_image: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>, qr_image: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            qr_image: qr_image.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Profile directory for a session identifier.
    pub fn profile_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Creates the profile directory for `id` if absent and returns its path.
    pub fn ensure_profile(&self, id: &str) -> Result<PathBuf> {
        let dir = self.profile_dir(id);
        fs::create_dir_all(&dir).map_err(|source| WaError::SessionStorage {
            path: dir.clone(),
            source,
        })?;
        debug!(target = "wasend.session", path = %dir.display(), "profile directory ready");
        Ok(dir)
    }

    /// Names of profiles currently present on disk.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(WaError::SessionStorage {
                    path: self.root.clone(),
                    source,
                });
            }
        };

        let mut profiles = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                profiles.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        profiles.sort();
        Ok(profiles)
    }

    /// Removes session data for `id`, or the entire session root when `id`
    /// is `None`. Idempotent: a missing target reports
    /// [`ResetOutcome::NothingToClear`] rather than failing.
    ///
    /// The QR image is removed only when session data was actually found,
    /// matching the nesting of the original cleanup behavior.
    pub fn reset(&self, id: Option<&str>) -> Result<ResetOutcome> {
        let target = match id {
            Some(id) => self.profile_dir(id),
            None => self.root.clone(),
        };

        if !target.exists() {
            return Ok(ResetOutcome::NothingToClear);
        }

        fs::remove_dir_all(&target).map_err(|source| WaError::SessionStorage {
            path: target.clone(),
            source,
        })?;
        info!(target = "wasend.session", path = %target.display(), "session data removed");

        let removed_qr_image = self.qr_image.exists();
        if removed_qr_image {
            fs::remove_file(&self.qr_image)?;
            info!(target = "wasend.session", path = %self.qr_image.display(), "QR image removed");
        }

        Ok(ResetOutcome::Cleared { removed_qr_image })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn store_in(dir: &Path) -> SessionStore {
        SessionStore::new(dir.join("whatsapp-session"), dir.join("whatsapp-qr.png"))
    }

    #[test]
    fn ensure_creates_and_reuses_profile_dirs() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let first = store.ensure_profile("default").unwrap();
        assert!(first.is_dir());

        // Second call is a no-op on an existing directory.
        let second = store.ensure_profile("default").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn list_reports_existing_profiles() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(store.list().unwrap().is_empty());
        store.ensure_profile("work").unwrap();
        store.ensure_profile("default").unwrap();
        assert_eq!(store.list().unwrap(), vec!["default", "work"]);
    }

    #[test]
    fn reset_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.ensure_profile("default").unwrap();

        assert_eq!(
            store.reset(None).unwrap(),
            ResetOutcome::Cleared {
                removed_qr_image: false
            }
        );
        assert_eq!(store.reset(None).unwrap(), ResetOutcome::NothingToClear);
    }

    #[test]
    fn reset_of_one_profile_leaves_the_others() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.ensure_profile("a").unwrap();
        store.ensure_profile("b").unwrap();

        assert!(matches!(
            store.reset(Some("a")).unwrap(),
            ResetOutcome::Cleared { .. }
        ));
        assert_eq!(store.list().unwrap(), vec!["b"]);
        assert_eq!(store.reset(Some("a")).unwrap(), ResetOutcome::NothingToClear);
    }

    #[test]
    fn reset_removes_qr_image_only_with_session_data() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let qr = dir.path().join("whatsapp-qr.png");

        // QR image alone: nothing to clear, image stays.
        fs::write(&qr, b"png").unwrap();
        assert_eq!(store.reset(None).unwrap(), ResetOutcome::NothingToClear);
        assert!(qr.exists());

        // With session data present, the image goes too.
        store.ensure_profile("default").unwrap();
        assert_eq!(
            store.reset(None).unwrap(),
            ResetOutcome::Cleared {
                removed_qr_image: true
            }
        );
        assert!(!qr.exists());
    }
}
