//! Process umask handling.
//!
//! Outside Linux, reading the umask requires setting it, so every read and
//! update goes through a process-wide mutex. The mutex only orders umask
//! calls; files created by other threads during a read still see the
//! temporary mask.

use crate::error::{FsError, FsResult};
use crate::perms::DEFAULT_UMASK;
use parking_lot::Mutex;

static UMASK_GUARD: Mutex<()> = parking_lot::const_mutex(());

/// File mode creation mask.
///
/// Bits set in the mask are cleared from the permissions of created files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Umask(u32);

impl Umask {
    /// Owner-only mask (`0o077`).
    pub const DEFAULT: Self = Self(DEFAULT_UMASK);

    /// Creates a mask from raw bits.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidUmask`] if `bits` has anything outside `0o777`.
    pub fn new(bits: u32) -> FsResult<Self> {
        if bits > 0o777 {
            return Err(FsError::InvalidUmask(bits));
        }
        Ok(Self(bits))
    }

    /// Returns the raw mask bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Clears the masked bits from `mode`.
    #[must_use]
    pub const fn apply(self, mode: u32) -> u32 {
        mode & !self.0
    }

    /// Reads the current process umask, leaving it unchanged.
    ///
    /// On Linux the mask is read from `/proc/self/status` when available.
    /// Elsewhere it can only be read by setting it, so the process umask is
    /// `0` for a moment: call this before any other thread creates files.
    #[cfg(unix)]
    #[must_use]
    pub fn capture() -> Self {
        use nix::sys::stat::{umask, Mode};

        let _guard = UMASK_GUARD.lock();
        if let Some(mask) = proc_status_umask() {
            return Self(mask);
        }
        let previous = umask(Mode::empty());
        umask(previous);
        Self(u32::from(previous.bits()) & 0o777)
    }

    /// Windows has no umask; the default mask is reported.
    #[cfg(not(unix))]
    #[must_use]
    pub fn capture() -> Self {
        let _guard = UMASK_GUARD.lock();
        Self::DEFAULT
    }

    /// Installs this mask as the process umask, returning the previous one.
    #[cfg(unix)]
    pub(crate) fn install(self) -> Self {
        use nix::sys::stat::{umask, Mode};

        let _guard = UMASK_GUARD.lock();
        let previous = umask(Mode::from_bits_truncate(self.0 as nix::libc::mode_t));
        Self(u32::from(previous.bits()) & 0o777)
    }

    #[cfg(not(unix))]
    pub(crate) fn install(self) -> Self {
        let _guard = UMASK_GUARD.lock();
        self
    }
}

/// Parses the `Umask:` line of `/proc/self/status` (Linux 4.7 and later).
#[cfg(target_os = "linux")]
fn proc_status_umask() -> Option<u32> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_status_umask(&status)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn proc_status_umask() -> Option<u32> {
    None
}

#[cfg(any(target_os = "linux", test))]
fn parse_status_umask(status: &str) -> Option<u32> {
    let value = status
        .lines()
        .find_map(|line| line.strip_prefix("Umask:"))?
        .trim();
    u32::from_str_radix(value, 8).ok().filter(|bits| *bits <= 0o777)
}

impl Default for Umask {
    fn default() -> Self {
        Self::DEFAULT
    }
}
