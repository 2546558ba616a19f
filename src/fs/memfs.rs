//! In-memory [`FileSystem`] double for pipeline tests.

use super::FileSystem;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct MemFs {
    dirs: RefCell<BTreeMap<PathBuf, u32>>,
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    unreadable: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
    broken_writes: BTreeSet<PathBuf>,
    creates: RefCell<Vec<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.add_dir("/");
        fs
    }

    /// Add a directory and all of its parents.
    pub fn add_dir<P: AsRef<Path>>(&self, path: P) {
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.dirs
                .borrow_mut()
                .entry(ancestor.to_path_buf())
                .or_insert(0o755);
        }
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file<P: AsRef<Path>>(&self, path: P, contents: &[u8]) {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
    }

    /// Reads of `path` fail with PermissionDenied.
    pub fn deny_read<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.unreadable.insert(path.as_ref().to_path_buf());
        self
    }

    /// mkdir/create directly inside `dir` fail with PermissionDenied.
    pub fn read_only_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.read_only.insert(dir.as_ref().to_path_buf());
        self
    }

    /// Writes through a handle for `path` fail with an I/O error.
    pub fn fail_writes_to<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.broken_writes.insert(path.as_ref().to_path_buf());
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    pub fn dir_mode(&self, path: &str) -> Option<u32> {
        self.dirs.borrow().get(Path::new(path)).copied()
    }

    pub fn creates(&self) -> Vec<PathBuf> {
        self.creates.borrow().clone()
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new("/"));
        if self.read_only.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is read-only", parent.display()),
            ));
        }
        if !self.dirs.borrow().contains_key(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", parent.display()),
            ));
        }
        Ok(())
    }
}

impl FileSystem for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.borrow().contains_key(path) || self.files.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains_key(path)
    }

    fn mkdir(&self, path: &Path, mode: u32) -> io::Result<()> {
        if self.exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists", path.display()),
            ));
        }
        self.check_parent(path)?;
        self.dirs.borrow_mut().insert(path.to_path_buf(), mode);
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} unreadable", path.display()),
            ));
        }
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        self.creates.borrow_mut().push(path.to_path_buf());
        self.check_parent(path)?;
        self.files.borrow_mut().insert(path.to_path_buf(), Vec::new());
        Ok(Box::new(MemFile {
            fs: self,
            path: path.to_path_buf(),
        }))
    }
}

struct MemFile<'a> {
    fs: &'a MemFs,
    path: PathBuf,
}

impl Write for MemFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fs.broken_writes.contains(&self.path) {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
        }
        self.fs
            .files
            .borrow_mut()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
