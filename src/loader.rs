//! Read-only input loading via memory maps.
//!
//! Inputs are mapped rather than read so large files cost no copy. The
//! mapping lives as long as the [`LoadedFile`] and is released on drop, which
//! covers every exit path including a failed load of the second input.

use std::fs::File;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::error::{DiffError, DiffResult};

/// Default upper bound on input size (100 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100_000_000;

/// Longest accepted path, in bytes.
const MAX_PATH_BYTES: usize = 4096;

#[derive(Debug)]
enum Backing {
    Mapped(Mmap),
    /// Zero-length files are not mapped.
    Empty,
}

/// A loaded input file, viewable as a byte slice.
#[derive(Debug)]
pub struct LoadedFile {
    path: PathBuf,
    backing: Backing,
}

impl LoadedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(map) => &map[..],
            Backing::Empty => &[],
        }
    }
}

impl Deref for LoadedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Load `path` as a read-only byte view no larger than `max_size` bytes.
pub fn load(path: &Path, max_size: u64) -> DiffResult<LoadedFile> {
    check_path_len(path)?;

    let file = File::open(path).map_err(|source| {
        // ENAMETOOLONG: the whole path fits but one component does not.
        if source.kind() == ErrorKind::InvalidFilename {
            DiffError::FilenameTooLong {
                path: path.to_path_buf(),
            }
        } else {
            DiffError::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let size = file
        .metadata()
        .map_err(|source| DiffError::StatFailed {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    if size > max_size {
        return Err(DiffError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    let backing = if size == 0 {
        Backing::Empty
    } else {
        Backing::Mapped(map_file(&file).map_err(|source| DiffError::MapFailed {
            path: path.to_path_buf(),
            source,
        })?)
    };

    debug!(path = %path.display(), size, "input loaded");
    Ok(LoadedFile {
        path: path.to_path_buf(),
        backing,
    })
}

/// Reject paths longer than [`MAX_PATH_BYTES`].
fn check_path_len(path: &Path) -> DiffResult<()> {
    if path.as_os_str().len() > MAX_PATH_BYTES {
        return Err(DiffError::FilenameTooLong {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[allow(unsafe_code)]
fn map_file(file: &File) -> std::io::Result<Mmap> {
    // SAFETY: the map is read-only and private to this process. Another
    // process truncating the file while we hold the map is outside what this
    // tool guards against.
    unsafe { Mmap::map(file) }
}
