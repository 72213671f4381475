//! core::paths
//!
//! Well-known locations used by repokit and home-directory expansion.
//!
//! # Locations
//!
//! - `~/.repokit/` - user data directory (config, secrets)
//! - `~/.ssh/config` - host SSH configuration (read-only)
//! - `~/.ssh/id_rsa` - default private key when no identity is configured
//!
//! All helpers take the home directory explicitly where it matters so tests
//! can point them at a temporary directory.

use std::path::{Path, PathBuf};

/// Name of the per-user data directory under `$HOME`.
pub const DATA_DIR_NAME: &str = ".repokit";

/// Default SSH config location, relative to home.
pub const SSH_CONFIG: &str = "~/.ssh/config";

/// Default private key when the host profile names none.
pub const DEFAULT_IDENTITY: &str = "~/.ssh/id_rsa";

/// Current user's home directory, if it can be determined.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// `~/.repokit`, if the home directory is known.
pub fn data_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(DATA_DIR_NAME))
}

/// Expand a leading `~` (alone or followed by `/`) against `home`.
///
/// Paths in any other form are returned unchanged, including `~user/...`.
///
/// # Example
///
/// ```
/// use repokit::core::paths::expand_home;
/// use std::path::{Path, PathBuf};
///
/// let home = Path::new("/home/dev");
/// assert_eq!(expand_home("~/.ssh/id_rsa", home), PathBuf::from("/home/dev/.ssh/id_rsa"));
/// assert_eq!(expand_home("~", home), PathBuf::from("/home/dev"));
/// assert_eq!(expand_home("/etc/key", home), PathBuf::from("/etc/key"));
/// ```
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}
