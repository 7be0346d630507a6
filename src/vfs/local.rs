/*!
 * Local Filesystem Backend
 * Read-only view of a host directory
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::traits::{AssetSource, Located};
use super::types::*;
use crate::core::StringPool;

/// Host directory mounted as a source
///
/// Nothing is scanned at mount time; each lookup probes the host filesystem.
#[derive(Debug, Clone)]
pub struct LocalFS {
    root: PathBuf,
    name: String,
}

impl LocalFS {
    /// Open a host directory, failing with `NotFound` if it is missing or not a directory
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, MountError> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(md) if md.is_dir() => Ok(Self {
                name: root.display().to_string(),
                root,
            }),
            Ok(_) => Err(MountError::NotFound(format!(
                "not a directory: {}",
                root.display()
            ))),
            Err(e) => Err(Self::mount_error(e, &root)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a relative virtual path
    ///
    /// Only plain name components are joined; anything else (roots, drive
    /// prefixes, parent references) makes the path unresolvable.
    /// [SECURITY] Lookups never leave `root`
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let mut result = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => result.push(name),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(result)
    }

    /// Convert std::io::Error to MountError
    fn mount_error(e: std::io::Error, path: &Path) -> MountError {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => MountError::NotFound(path.display().to_string()),
            _ => MountError::Io(format!("{}: {}", path.display(), e)),
        }
    }
}

impl AssetSource for LocalFS {
    fn lookup<'a>(&'a self, relative: &str, _pool: &StringPool) -> Option<Located<'a>> {
        let path = self.resolve(relative)?;
        let md = fs::metadata(&path).ok()?;

        if md.is_file() {
            Some(Located::HostFile {
                size: md.len(),
                path,
            })
        } else if md.is_dir() {
            Some(Located::HostDirectory(path))
        } else {
            None
        }
    }

    fn list_dir(&self, relative: &str, _pool: &StringPool) -> Option<Vec<DirEntry>> {
        let path = self.resolve(relative)?;
        let entries = fs::read_dir(&path).ok()?;

        let mut result = Vec::new();
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let file_type = if file_type.is_dir() {
                FileType::Directory
            } else if file_type.is_file() {
                FileType::File
            } else {
                continue;
            };
            result.push(DirEntry::new(name, file_type));
        }

        result.sort_by(|a, b| a.name.cmp(&b.name));
        Some(result)
    }

    fn kind(&self) -> MountKind {
        MountKind::Directory
    }

    fn host_path(&self) -> Option<&Path> {
        Some(&self.root)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
