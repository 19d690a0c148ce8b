//! Path-safe JSON output

use crate::error::WriteError;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Resolve `file_name` inside `base_dir`, rejecting anything that would land outside it
///
/// The base directory is created if missing.
pub fn resolve_output_path(base_dir: &Path, file_name: &str) -> Result<PathBuf, WriteError> {
    if file_name.trim().is_empty() {
        return Err(WriteError::InvalidFileName(file_name.to_string()));
    }

    let relative = Path::new(file_name);
    if relative.is_absolute() || relative.has_root() {
        return Err(WriteError::PathEscape {
            path: relative.to_path_buf(),
            base: base_dir.to_path_buf(),
        });
    }

    std::fs::create_dir_all(base_dir).map_err(|source| WriteError::Io {
        path: base_dir.to_path_buf(),
        source,
    })?;
    let base = base_dir.canonicalize().map_err(|source| WriteError::Io {
        path: base_dir.to_path_buf(),
        source,
    })?;

    let target = normalize(&base.join(relative));
    if !target.starts_with(&base) || target == base {
        return Err(WriteError::PathEscape { path: target, base });
    }

    // Symlinks below the base may still point elsewhere
    let resolved = resolve_links(&target).map_err(|_| WriteError::PathEscape {
        path: target.clone(),
        base: base.clone(),
    })?;
    if !resolved.starts_with(&base) || resolved == base {
        return Err(WriteError::PathEscape {
            path: resolved,
            base,
        });
    }

    Ok(resolved)
}

/// Pretty-print `value` to `<base_dir>/<file_name>`
pub fn write_json(base_dir: &Path, file_name: &str, value: &Value) -> Result<PathBuf, WriteError> {
    let target = resolve_output_path(base_dir, file_name)?;

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    std::fs::write(&target, content).map_err(|source| WriteError::Io {
        path: target.clone(),
        source,
    })?;

    info!("Wrote {}", target.display());
    Ok(target)
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the rest
///
/// A dangling symlink anywhere on the way fails to canonicalize.
fn resolve_links(path: &Path) -> std::io::Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while existing.symlink_metadata().is_err() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = existing.canonicalize()?;
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}

/// Lexically resolve `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
