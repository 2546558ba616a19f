//! Mountpoint skeleton the installer expects under the target root.

use crate::error::InstallError;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};

pub const TARGET_DIRS: [&str; 4] = ["proc", "dev", "sys", "tmp"];
pub const TARGET_DIR_MODE: u32 = 0o755;

/// Create whichever of `proc`, `dev`, `sys`, `tmp` are missing and return the
/// ones that were created. Stops at the first failure; earlier directories are
/// left in place.
pub fn ensure_target_dirs(
    fs: &dyn FileSystem,
    target_root: &Path,
) -> Result<Vec<PathBuf>, InstallError> {
    let mut created = Vec::new();
    for name in TARGET_DIRS {
        let dir = target_root.join(name);
        if fs.is_dir(&dir) {
            continue;
        }
        fs.mkdir(&dir, TARGET_DIR_MODE)
            .map_err(|source| InstallError::Bootstrap {
                dir: dir.clone(),
                source,
            })?;
        tracing::debug!(dir = %dir.display(), "created target directory");
        created.push(dir);
    }
    Ok(created)
}
