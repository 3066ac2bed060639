//! Permission bits used across Hearth.

/// Mode for files readable by everyone.
pub const FILE_PERMISSIONS_DEFAULT: u32 = 0o644;

/// Mode for directories traversable by everyone.
pub const DIR_PERMISSIONS_DEFAULT: u32 = 0o755;

/// Mode for files only the owner may read or write.
pub const FILE_PERMISSIONS_PRIVATE: u32 = 0o600;

/// Mode for directories only the owner may enter.
pub const DIR_PERMISSIONS_PRIVATE: u32 = 0o700;

/// Umask assumed before the process umask has been captured.
pub const DEFAULT_UMASK: u32 = 0o077;
