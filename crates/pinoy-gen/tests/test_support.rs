//! Capability-scoped scratch directories for pinoy-gen integration tests.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fresh directory under `target/pinoy-gen-tests`, unique per process and call.
pub struct Scratch {
    dir: Dir,
    path: Utf8PathBuf,
}

impl Scratch {
    /// Create the directory and open a handle scoped to it.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while creating or opening it.
    pub fn new(prefix: &str) -> io::Result<Self> {
        static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);
        let counter = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = Utf8PathBuf::from("target")
            .join("pinoy-gen-tests")
            .join(format!("{prefix}-{}-{counter}", std::process::id()));
        let root = Dir::open_ambient_dir(".", ambient_authority())?;
        root.create_dir_all(&path)?;
        let dir = root.open_dir(&path)?;
        Ok(Self { dir, path })
    }

    /// Path of `name` inside the scratch directory.
    pub fn path_of(&self, name: &str) -> Utf8PathBuf {
        self.path.join(name)
    }

    /// Write `contents` to `name`, returning its full path.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while writing.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<Utf8PathBuf> {
        self.dir.write(name, contents)?;
        Ok(self.path_of(name))
    }

    /// Read `name` back as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while reading.
    pub fn read(&self, name: &str) -> io::Result<String> {
        self.dir.read_to_string(name)
    }

    /// Sorted names of every entry in the directory.
    ///
    /// # Errors
    ///
    /// Returns any filesystem errors encountered while listing.
    pub fn entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in self.dir.entries()? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
