//! Read-only input bytes.
//!
//! The aggregation engine only ever needs `&[u8]`. This type lets the same
//! engine run over a memory-mapped file (production) or an owned buffer
//! (tests, in-memory callers) without tying scanners to file handles.
//!
//! Clones are cheap: the underlying bytes are reference-counted and treated
//! as immutable for the lifetime of any `InputBytes`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use crate::errors::InputError;

/// Read-only view over the measurement bytes.
#[derive(Clone, Debug)]
pub struct InputBytes {
    inner: InputInner,
}

#[derive(Clone, Debug)]
enum InputInner {
    Mmap(Arc<Mmap>),
    Owned(Arc<[u8]>),
}

impl InputBytes {
    /// Map a file read-only.
    ///
    /// Zero-length files are not mapped (several platforms reject empty
    /// mappings); they yield an empty owned view instead.
    pub fn open(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let len = file
            .metadata()
            .map_err(|source| InputError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        if len == 0 {
            return Ok(Self::from_vec(Vec::new()));
        }

        // SAFETY: the input is treated as immutable for the duration of a job.
        // Concurrent truncation by another process is outside our contract.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| InputError::Map {
            path: path.to_path_buf(),
            source,
        })?;
        advise_sequential(&mmap);
        Ok(Self::from_mmap(mmap))
    }

    /// Wrap a memory-mapped file.
    #[must_use]
    pub fn from_mmap(mmap: Mmap) -> Self {
        Self {
            inner: InputInner::Mmap(Arc::new(mmap)),
        }
    }

    /// Wrap owned bytes.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            inner: InputInner::Owned(Arc::from(bytes)),
        }
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        match &self.inner {
            InputInner::Mmap(mmap) => mmap.as_ref(),
            InputInner::Owned(bytes) => bytes.as_ref(),
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// True when backed by a file mapping.
    pub fn is_mapped(&self) -> bool {
        matches!(self.inner, InputInner::Mmap(_))
    }
}

// Each worker walks its own range front to back.
#[cfg(unix)]
fn advise_sequential(mmap: &Mmap) {
    let _ = mmap.advise(memmap2::Advice::Sequential);
}

#[cfg(not(unix))]
fn advise_sequential(_mmap: &Mmap) {}
