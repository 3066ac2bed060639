//! Explicit filesystem context.

use crate::atomic;
use crate::error::FsResult;
use crate::umask::Umask;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Process filesystem settings, passed to the components that create files.
///
/// An application builds one with [`Filesystem::init`] before anything else
/// touches the disk, then hands copies to the components that need it.
///
/// # Example
///
/// ```rust
/// use hearth_fs::{Filesystem, Umask};
///
/// let fs = Filesystem::with_umask(Umask::new(0o022).unwrap());
/// assert_eq!(fs.umask().apply(0o666), 0o644);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filesystem {
    umask: Umask,
}

impl Filesystem {
    /// Captures the current process umask.
    ///
    /// Call this at startup, before spawning threads: on platforms where the
    /// umask can only be read by changing it, a file created concurrently by
    /// another thread would get the wrong permissions.
    #[must_use]
    pub fn init() -> Self {
        let umask = Umask::capture();
        debug!(umask = format_args!("{:#o}", umask.bits()), "captured process umask");
        Self { umask }
    }

    /// Creates a context with an explicit umask, leaving the process alone.
    #[must_use]
    pub const fn with_umask(umask: Umask) -> Self {
        Self { umask }
    }

    /// Returns the umask applied to created files.
    #[must_use]
    pub const fn umask(&self) -> Umask {
        self.umask
    }

    /// Installs `umask` as the process umask and records it.
    pub fn set_umask(&mut self, umask: Umask) {
        if umask == self.umask {
            return;
        }
        let previous = umask.install();
        debug!(
            previous = format_args!("{:#o}", previous.bits()),
            current = format_args!("{:#o}", umask.bits()),
            "process umask updated"
        );
        self.umask = umask;
    }

    /// Atomically writes `data` to `path` with `permissions` masked by this umask.
    ///
    /// # Errors
    ///
    /// See [`atomic::write_file`].
    pub fn write_file(&self, path: &Path, data: &[u8], permissions: u32) -> FsResult<()> {
        atomic::write_file(path, data, permissions, self.umask)
    }

    /// Creates `path` and its missing parents with `permissions`.
    ///
    /// On Unix the kernel applies the process umask to the mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub fn create_dir_all(&self, path: &Path, permissions: u32) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(permissions);
        }
        #[cfg(not(unix))]
        let _ = permissions;
        builder.create(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perms::{DIR_PERMISSIONS_PRIVATE, FILE_PERMISSIONS_PRIVATE};
    use tempfile::tempdir;

    #[test]
    fn default_uses_owner_only_mask() {
        assert_eq!(Filesystem::default().umask(), Umask::DEFAULT);
    }

    #[test]
    fn set_umask_to_same_value_is_noop() {
        let mut fs = Filesystem::init();
        let current = fs.umask();
        fs.set_umask(current);
        assert_eq!(fs.umask(), current);
        assert_eq!(Umask::capture(), current);
    }

    #[test]
    fn write_file_through_context() {
        let dir = tempdir().unwrap();
        let fs = Filesystem::with_umask(Umask::DEFAULT);
        let nested = dir.path().join("a").join("b");

        fs.create_dir_all(&nested, DIR_PERMISSIONS_PRIVATE).unwrap();
        fs.write_file(&nested.join("f"), b"data", FILE_PERMISSIONS_PRIVATE)
            .unwrap();

        assert_eq!(std::fs::read(nested.join("f")).unwrap(), b"data");
    }
}
