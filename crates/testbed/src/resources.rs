// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Temporary files and directories scoped to one test.
//!
//! Everything lives under a private root created on first use. Paths are
//! removed in reverse creation order by [`TempResources::release`], which
//! also runs on drop.

use crate::error::{HarnessError, Result};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use testbed_capture::logger::INTERNAL_TARGET;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Dir,
    File,
}

/// Registry of temporary paths, deleted on release
#[derive(Debug, Default)]
pub struct TempResources {
    root: Option<TempDir>,
    created: Vec<(PathBuf, Kind)>,
    last_dir: Option<PathBuf>,
    counter: usize,
}

impl TempResources {
    pub fn new() -> Self {
        Self::default()
    }

    fn root(&mut self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.path().to_path_buf());
        }
        let root = tempfile::Builder::new().prefix("testbed-").tempdir()?;
        let path = root.path().to_path_buf();
        self.root = Some(root);
        Ok(path)
    }

    fn next_name(&mut self, stem: &str) -> String {
        self.counter += 1;
        format!("{}-{}", stem, self.counter)
    }

    /// The private root, once anything has been created
    pub fn root_path(&self) -> Option<&Path> {
        self.root.as_ref().map(TempDir::path)
    }

    /// Create a fresh directory under the private root
    pub fn create_dir(&mut self) -> Result<PathBuf> {
        let name = self.next_name("dir");
        let path = self.root()?.join(name);
        fs::create_dir(&path)?;
        self.created.push((path.clone(), Kind::Dir));
        self.last_dir = Some(path.clone());
        Ok(path)
    }

    /// Create `segments` under the most recent [`create_dir`](Self::create_dir)
    /// directory, creating one first if there is none
    pub fn create_sub_dir(&mut self, segments: &[&str]) -> Result<PathBuf> {
        let parent = match &self.last_dir {
            Some(dir) => dir.clone(),
            None => self.create_dir()?,
        };
        self.create_sub_dir_in(&parent, segments)
    }

    /// Create `segments` under `parent`, registering each new level
    pub fn create_sub_dir_in(&mut self, parent: &Path, segments: &[&str]) -> Result<PathBuf> {
        if segments.is_empty() {
            return Err(HarnessError::config("sub directory needs at least one segment"));
        }
        let mut path = parent.to_path_buf();
        for segment in segments {
            check_segment(segment)?;
            path.push(segment);
            match fs::create_dir(&path) {
                Ok(()) => self.created.push((path.clone(), Kind::Dir)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(path)
    }

    /// Write `contents` to a new file under the private root
    pub fn create_file(&mut self, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
        let name = self.next_name("file");
        let dir = self.root()?;
        self.create_file_in(&dir, &name, contents)
    }

    /// Write `contents` to `dir/name`
    pub fn create_file_in(
        &mut self,
        dir: &Path,
        name: &str,
        contents: impl AsRef<[u8]>,
    ) -> Result<PathBuf> {
        check_segment(name)?;
        let path = dir.join(name);
        fs::write(&path, contents)?;
        self.created.push((path.clone(), Kind::File));
        Ok(path)
    }

    /// Write `lines` as an executable script under the private root
    pub fn create_executable_script<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<PathBuf> {
        let mut body = String::new();
        for line in lines {
            body.push_str(line.as_ref());
            body.push('\n');
        }
        let path = self.create_file(body)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }

    /// Registered paths in creation order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.created.iter().map(|(path, _)| path.as_path())
    }

    /// Remove every registered path, newest first, then the private root.
    ///
    /// Missing paths are skipped; other failures are logged. Calling again
    /// is a no-op.
    pub fn release(&mut self) {
        let count = self.created.len();
        for (path, kind) in self.created.drain(..).rev() {
            let result = match kind {
                Kind::Dir => fs::remove_dir_all(&path),
                Kind::File => fs::remove_file(&path),
            };
            match result {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    log::warn!(target: INTERNAL_TARGET, "Failed to remove {}: {}", path.display(), e)
                }
            }
        }
        self.last_dir = None;

        if let Some(root) = self.root.take() {
            let root_path = root.path().to_path_buf();
            if let Err(e) = root.close() {
                log::warn!(
                    target: INTERNAL_TARGET,
                    "Failed to remove temp root {}: {}",
                    root_path.display(),
                    e
                );
            }
            log::debug!(target: INTERNAL_TARGET, "Released {} temp paths", count);
        }
    }
}

impl Drop for TempResources {
    fn drop(&mut self) {
        self.release();
    }
}

fn check_segment(segment: &str) -> Result<()> {
    let mut components = Path::new(segment).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(HarnessError::config(format!(
            "invalid path segment {:?}",
            segment
        ))),
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
