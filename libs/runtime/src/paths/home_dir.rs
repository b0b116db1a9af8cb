//! Resolution of the server home directory (logs, SQLite files).

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the user home directory")]
    NoUserHome,

    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve `configured` into an absolute directory.
///
/// - `None` (or empty) falls back to `<user home>/<default_subdir>`.
/// - A leading `~` is expanded to the user home.
/// - Relative paths are anchored at the current working directory.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let resolved = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some(raw) => expand(raw)?,
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .map_err(|source| HomeDirError::Create {
                path: resolved.clone(),
                source,
            })?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute).map_err(|source| HomeDirError::Create {
            path: absolute.clone(),
            source,
        })?;
    }
    Ok(absolute)
}

fn expand(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    dirs::home_dir().ok_or(HomeDirError::NoUserHome)
}
