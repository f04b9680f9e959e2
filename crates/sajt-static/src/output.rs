//! Planned output files and the output directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::builder::BuildError;

/// A file to be written, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Contents as text, for HTML files.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }
}

/// Everything one build produces, in the order it was planned.
#[derive(Debug, Default)]
pub struct SiteOutput {
    files: Vec<OutputFile>,
    positions: HashMap<PathBuf, usize>,
}

impl SiteOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. A later file for the same path replaces the earlier one.
    pub fn push(&mut self, file: OutputFile) {
        match self.positions.get(&file.path) {
            Some(&pos) => {
                tracing::warn!(
                    "{} is produced more than once; keeping the last one",
                    file.path.display()
                );
                self.files[pos] = file;
            }
            None => {
                self.positions.insert(file.path.clone(), self.files.len());
                self.files.push(file);
            }
        }
    }

    pub fn extend(&mut self, files: impl IntoIterator<Item = OutputFile>) {
        for file in files {
            self.push(file);
        }
    }

    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&OutputFile> {
        self.positions
            .get(path.as_ref())
            .map(|&pos| &self.files[pos])
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file below `out_dir`, creating directories as needed.
    pub fn write_to(&self, out_dir: &Path) -> Result<(), BuildError> {
        for file in &self.files {
            let target = out_dir.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| write_error(parent, e))?;
            }
            fs::write(&target, &file.contents).map_err(|e| write_error(&target, e))?;
        }
        Ok(())
    }
}

fn write_error(path: &Path, e: io::Error) -> BuildError {
    BuildError::WriteError(format!("{}: {}", path.display(), e))
}

/// Hook run around wiping the output directory.
pub trait WipeHook {
    /// Called before the output directory is removed.
    fn before_wipe(&mut self, out_dir: &Path) -> io::Result<()>;

    /// Called once the output directory exists again, empty.
    fn after_wipe(&mut self, out_dir: &Path) -> io::Result<()>;
}

/// Keeps `.git` in the output directory across wipes by moving it next to
/// the output directory and back.
#[derive(Debug, Default)]
pub struct GitPreserver {
    stashed: Option<PathBuf>,
}

impl GitPreserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn stash_path(out_dir: &Path) -> PathBuf {
        let name = out_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        out_dir.with_file_name(format!(".{}.git-stash", name))
    }
}

impl WipeHook for GitPreserver {
    fn before_wipe(&mut self, out_dir: &Path) -> io::Result<()> {
        let git = out_dir.join(".git");
        let stash = Self::stash_path(out_dir);

        if !git.exists() {
            // Left behind by an interrupted build
            if stash.exists() {
                self.stashed = Some(stash);
            }
            return Ok(());
        }

        if stash.exists() {
            fs::remove_dir_all(&stash)?;
        }

        match fs::rename(&git, &stash) {
            Ok(()) => {
                tracing::debug!("Moved {} aside", git.display());
                self.stashed = Some(stash);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn after_wipe(&mut self, out_dir: &Path) -> io::Result<()> {
        if let Some(stash) = self.stashed.take() {
            fs::rename(&stash, out_dir.join(".git"))?;
            tracing::debug!("Restored {}", out_dir.join(".git").display());
        }
        Ok(())
    }
}

/// Remove and recreate `out_dir`, running `hook` around the removal.
///
/// A missing output directory is not an error.
pub fn reset_output_dir(out_dir: &Path, hook: &mut dyn WipeHook) -> Result<(), BuildError> {
    hook.before_wipe(out_dir).map_err(|e| write_error(out_dir, e))?;

    match fs::remove_dir_all(out_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(write_error(out_dir, e)),
    }
    fs::create_dir_all(out_dir).map_err(|e| write_error(out_dir, e))?;

    hook.after_wipe(out_dir).map_err(|e| write_error(out_dir, e))
}
