//! Depth-first directory walk yielding regular files.
//!
//! Entries are visited in lexical order within each directory. Directories are
//! descended into but never yielded. Only regular files are yielded: a symbolic
//! link is yielded when its target is a regular file and is never followed into
//! a directory. FIFOs, sockets, device nodes and dangling links are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use cloudinary_core::{CloudinaryError, Result};
use tracing::debug;

/// Lazy sequence of the files below `root`.
///
/// Each call to [`FileWalk::new`] starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct FileWalk {
    root: PathBuf,
    started: bool,
    stack: Vec<std::vec::IntoIter<PathBuf>>,
}

impl FileWalk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            started: false,
            stack: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn descend(&mut self, dir: &Path) -> Result<()> {
        let mut children = fs::read_dir(dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()
            })
            .map_err(|e| CloudinaryError::path(dir, e))?;
        children.sort();
        self.stack.push(children.into_iter());
        Ok(())
    }
}

impl Iterator for FileWalk {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            let root = self.root.clone();
            if let Err(e) = self.descend(&root) {
                return Some(Err(e));
            }
        }

        loop {
            let next = self.stack.last_mut()?.next();
            let Some(path) = next else {
                self.stack.pop();
                continue;
            };

            let metadata = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => return Some(Err(CloudinaryError::path(&path, e))),
            };
            let file_type = metadata.file_type();
            if file_type.is_dir() {
                if let Err(e) = self.descend(&path) {
                    return Some(Err(e));
                }
                continue;
            }
            if file_type.is_file() || (file_type.is_symlink() && points_to_file(&path)) {
                return Some(Ok(path));
            }
            debug!(path = %path.display(), "Skipping non-regular file");
        }
    }
}

fn points_to_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_file())
}
