//! Symlink-agnostic relative paths.
//!
//! Environments are made relocatable by writing paths relative to the file
//! that references them. Both ends are resolved to their real location first,
//! so a directory reached through a symlink yields the same relative path as
//! the directory itself.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while computing a relative path.
#[derive(Debug, Error)]
pub enum PathError {
  #[error("no common root between {} and {}", from.display(), to.display())]
  CrossVolume { from: PathBuf, to: PathBuf },

  #[error("failed to make {} absolute: {source}", path.display())]
  Absolute { path: PathBuf, source: std::io::Error },
}

/// Compute the path of `to_dir` relative to `from_dir`.
///
/// Symlinks are resolved on both sides before comparing, and the common
/// prefix is matched component by component. Identical directories yield `.`.
/// Components that do not exist yet are appended lexically to the real path
/// of their closest existing ancestor.
///
/// # Errors
///
/// Returns [`PathError::CrossVolume`] when the two paths live on different
/// drives or shares and no relative path exists.
pub fn relative_path(from_dir: &Path, to_dir: &Path) -> Result<PathBuf, PathError> {
  let from = real_path(from_dir)?;
  let to = real_path(to_dir)?;
  relative_between(&from, &to)
}

/// Resolve `path` to its real location without requiring it to exist.
pub fn real_path(path: &Path) -> Result<PathBuf, PathError> {
  let absolute = std::path::absolute(path).map_err(|source| PathError::Absolute {
    path: path.to_path_buf(),
    source,
  })?;
  let components: Vec<Component<'_>> = absolute.components().collect();

  for split in (1..=components.len()).rev() {
    let head: PathBuf = components[..split].iter().collect();
    if let Ok(real) = dunce::canonicalize(&head) {
      return Ok(append_lexically(real, &components[split..]));
    }
  }

  Ok(append_lexically(PathBuf::new(), &components))
}

fn append_lexically(mut base: PathBuf, rest: &[Component<'_>]) -> PathBuf {
  for component in rest {
    match component {
      Component::ParentDir => {
        base.pop();
      }
      Component::CurDir => {}
      other => base.push(other),
    }
  }
  base
}

fn relative_between(from: &Path, to: &Path) -> Result<PathBuf, PathError> {
  let from_parts: Vec<Component<'_>> = from.components().collect();
  let to_parts: Vec<Component<'_>> = to.components().collect();

  let same_volume = match (from_parts.first(), to_parts.first()) {
    (Some(Component::Prefix(a)), Some(Component::Prefix(b))) => a == b,
    (Some(Component::Prefix(_)), _) | (_, Some(Component::Prefix(_))) => false,
    _ => true,
  };

  let common = from_parts
    .iter()
    .zip(&to_parts)
    .take_while(|(a, b)| a == b)
    .count();

  if !same_volume || common == 0 {
    return Err(PathError::CrossVolume {
      from: from.to_path_buf(),
      to: to.to_path_buf(),
    });
  }

  let mut relative = PathBuf::new();
  for _ in common..from_parts.len() {
    relative.push("..");
  }
  for component in &to_parts[common..] {
    relative.push(component);
  }

  if relative.as_os_str().is_empty() {
    relative.push(".");
  }
  Ok(relative)
}
