//! Path and name validation.
//!
//! Local archive files are addressed by paths relative to a category
//! directory, and remote folders/files by single names. Both are checked here
//! before they reach the filesystem or the network.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a path relative to a local archive directory.
/// Ensures that paths don't escape the directory (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use hoard_storage::validate_path;
/// assert!(validate_path("audio_123.mp3").is_ok());
/// assert!(validate_path("nested/imagem_1.jpeg").is_ok());
/// assert!(validate_path("../audio_123.mp3").is_err());
/// assert!(validate_path("a\0b").is_err());
/// assert_eq!(validate_path("./x//audio_1.mp3").unwrap(), Path::new("x/audio_1.mp3"));
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Validates a single remote folder or file name.
///
/// Remote trees are built one segment at a time, so a name must never smuggle
/// in a separator or a relative component.
///
/// ```
/// use hoard_storage::validate_name;
/// assert!(validate_name("Audios").is_ok());
/// assert!(validate_name("Músicas e Letras").is_ok());
/// assert!(validate_name("Audios/2024").is_err());
/// assert!(validate_name("..").is_err());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<&str> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        exn::bail!(ErrorKind::InvalidName(name.to_string()));
    }
    Ok(name)
}
