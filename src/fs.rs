//! Pluggable file system abstraction used by `@import` resolution.

use std::fmt::Debug;
use std::io;
use std::path::Path;

/// A file system the compiler reads imports through.
///
/// Implement this to compile against an in-memory tree, a bundler's
/// virtual file system, or to forbid imports entirely.
pub trait Fs: Debug {
    /// Returns `true` if the path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read the entire contents of the file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// A file system backed by [`std::fs`].
#[derive(Debug)]
pub struct StdFs;

impl Fs for StdFs {
    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    #[inline]
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// A file system that contains no files.
#[derive(Debug)]
pub struct NullFs;

impl Fs for NullFs {
    #[inline]
    fn is_file(&self, _: &Path) -> bool {
        false
    }

    #[inline]
    fn read(&self, _: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "NullFs, there is no file system",
        ))
    }
}
