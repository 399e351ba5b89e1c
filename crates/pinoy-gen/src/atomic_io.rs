//! Atomic output file writes for the generation CLI.
//!
//! Output is written to a hidden sibling file, synced, then renamed over the
//! target, so readers never observe a half-written envelope.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs::{Dir, OpenOptions};

use crate::generate_cli::CliError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to the file `name` inside `dir` atomically.
///
/// `name` must be a single normal path component; `dir` carries the
/// capability to write into the parent directory.
///
/// # Errors
///
/// Returns [`CliError::WriteError`] if the temp file cannot be written or
/// renamed. The temp file is removed on failure.
pub(crate) fn write_atomic(dir: &Dir, name: &Utf8Path, contents: &str) -> Result<(), CliError> {
    let file_name = single_file_name(name)?;
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    let written = write_synced(dir, &tmp_name, contents)
        .and_then(|()| dir.rename(&tmp_name, dir, file_name));
    if let Err(err) = written {
        if dir.remove_file(&tmp_name).is_err() {
            // Temp file may never have been created.
        }
        return Err(write_error(name.to_path_buf(), &err));
    }

    // Best-effort directory sync.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Ignore sync failures.
    }
    Ok(())
}

fn single_file_name(name: &Utf8Path) -> Result<&str, CliError> {
    let mut components = name.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(file_name)), None) => Ok(file_name),
        _ => Err(CliError::WriteError {
            path: name.to_path_buf(),
            message: "output path must name a file".to_owned(),
        }),
    }
}

fn write_synced(dir: &Dir, tmp_name: &str, contents: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()
}

fn write_error(path: Utf8PathBuf, err: &io::Error) -> CliError {
    CliError::WriteError {
        path,
        message: err.to_string(),
    }
}
