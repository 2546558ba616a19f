// ============================================================================
// src/fs/mod.rs – Filesystem capability used by the install pipeline
// ============================================================================

use std::fs::{self, DirBuilder, File};
use std::io::{self, Write};
use std::os::unix::fs::DirBuilderExt;
use std::path::{Component, Path, PathBuf};

#[cfg(test)]
pub mod memfs;

/// The handful of filesystem operations the pipeline needs. Paths are always
/// absolute as seen from the provisioning host; implementations decide where
/// they really land.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Create a single directory (no parents) with an explicit mode.
    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Create or truncate a file for writing. Dropping the writer closes it.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;
}

/// The host filesystem, paths taken verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        DirBuilder::new().mode(mode).create(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        Ok(Box::new(File::create(path)?))
    }
}

/// Host filesystem re-rooted below `root`: `/boot/grub2` becomes
/// `<root>/boot/grub2`. Used for dry runs and on-disk tests.
#[derive(Debug, Clone)]
pub struct RootedFs {
    root: PathBuf,
}

impl RootedFs {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a host-absolute path into the rooted tree. `..` components are
    /// dropped so nothing resolves outside `root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let relative: PathBuf = path
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        self.root.join(relative)
    }
}

impl FileSystem for RootedFs {
    fn exists(&self, path: &Path) -> bool {
        OsFs.exists(&self.resolve(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        OsFs.is_dir(&self.resolve(path))
    }

    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        OsFs.mkdir(&self.resolve(path), mode)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        OsFs.read(&self.resolve(path))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        Ok(Box::new(File::create(self.resolve(path))?))
    }
}
