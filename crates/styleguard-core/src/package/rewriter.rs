//! Streaming zip-to-zip rewrite with an atomic replace of the destination.
//!
//! Every source entry is offered to a `mutate` callback that keeps it (raw
//! copy of the compressed entry), replaces it, or drops it. Regenerated parts
//! are appended after the source entries. The archive is written to a hidden
//! temporary sibling of the destination and renamed over it only after it has
//! been flushed and synced; any earlier failure deletes the temporary file.

use crate::error::{Result, StyleguardError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

/// What to do with one source entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartAction {
    Keep,
    Replace(Vec<u8>),
    Skip,
}

/// A part written after all source entries.
#[derive(Debug, Clone)]
pub struct AppendedPart {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl AppendedPart {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RewriteSummary {
    pub destination: PathBuf,
    pub kept: Vec<String>,
    pub replaced: Vec<String>,
    pub skipped: Vec<String>,
    pub appended: Vec<String>,
}

/// Deletes the temporary archive unless the rewrite committed.
struct TempFileGuard {
    path: PathBuf,
    committed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            committed: false,
        }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.path) {
                debug!(path = %self.path.display(), error = %e, "temporary archive not removed");
            }
        }
    }
}

pub struct PackageRewriter;

impl PackageRewriter {
    /// Rewrite `source` into `destination`. Source entries whose name matches
    /// an appended part are dropped without consulting `mutate`, so a
    /// regenerated part never appears twice.
    pub fn rewrite<F>(
        source: &Path,
        destination: &Path,
        mutate: F,
        appended: &[AppendedPart],
    ) -> Result<RewriteSummary>
    where
        F: FnMut(&str, &[u8]) -> PartAction,
    {
        Self::rewrite_checked(source, destination, mutate, appended, |_, _| Ok(()))
    }

    /// Like [`rewrite`](Self::rewrite), with `before_commit` run on the
    /// finished, synced temporary archive. An error from it aborts the
    /// rewrite: the temporary file is deleted and `destination` is left as
    /// it was.
    pub fn rewrite_checked<F, C>(
        source: &Path,
        destination: &Path,
        mut mutate: F,
        appended: &[AppendedPart],
        before_commit: C,
    ) -> Result<RewriteSummary>
    where
        F: FnMut(&str, &[u8]) -> PartAction,
        C: FnOnce(&Path, &RewriteSummary) -> Result<()>,
    {
        let temp_path = temp_sibling(destination)?;
        let mut guard = TempFileGuard::new(temp_path.clone());

        let mut summary = RewriteSummary {
            destination: destination.to_path_buf(),
            ..Default::default()
        };

        {
            let source_file = File::open(source).map_err(|e| StyleguardError::io(source, e))?;
            let mut archive = ZipArchive::new(BufReader::new(source_file))?;

            let temp_file =
                File::create(&temp_path).map_err(|e| StyleguardError::io(&temp_path, e))?;
            let mut writer = ZipWriter::new(BufWriter::new(temp_file));

            let shadowed: HashSet<&str> = appended.iter().map(|p| p.name.as_str()).collect();

            for i in 0..archive.len() {
                let (name, is_dir) = {
                    let entry = archive.by_index_raw(i)?;
                    (entry.name().to_string(), entry.is_dir())
                };

                if shadowed.contains(name.as_str()) {
                    debug!(part = %name, "dropping entry regenerated by caller");
                    summary.skipped.push(name);
                    continue;
                }

                if is_dir {
                    writer.raw_copy_file(archive.by_index_raw(i)?)?;
                    continue;
                }

                let content = {
                    let mut entry = archive.by_index(i)?;
                    let mut content = Vec::new();
                    entry.read_to_end(&mut content).map_err(|e| {
                        StyleguardError::package(format!("cannot read '{}': {}", name, e))
                    })?;
                    content
                };

                match mutate(&name, &content) {
                    PartAction::Keep => {
                        writer.raw_copy_file(archive.by_index_raw(i)?)?;
                        summary.kept.push(name);
                    }
                    PartAction::Replace(bytes) => {
                        write_entry(&mut writer, &name, &bytes)?;
                        debug!(part = %name, bytes = bytes.len(), "replaced part");
                        summary.replaced.push(name);
                    }
                    PartAction::Skip => {
                        debug!(part = %name, "skipped part");
                        summary.skipped.push(name);
                    }
                }
            }

            for part in appended {
                write_entry(&mut writer, &part.name, &part.bytes)?;
                debug!(part = %part.name, bytes = part.bytes.len(), "appended part");
                summary.appended.push(part.name.clone());
            }

            let buffered = writer.finish()?;
            let temp_file = buffered
                .into_inner()
                .map_err(|e| StyleguardError::io(&temp_path, e.into_error()))?;
            temp_file
                .sync_all()
                .map_err(|e| StyleguardError::io(&temp_path, e))?;
        }

        before_commit(&temp_path, &summary)?;

        fs::rename(&temp_path, destination).map_err(|e| StyleguardError::io(destination, e))?;
        guard.committed = true;

        debug!(
            destination = %destination.display(),
            kept = summary.kept.len(),
            replaced = summary.replaced.len(),
            appended = summary.appended.len(),
            "package rewritten"
        );
        Ok(summary)
    }
}

fn write_entry<W: Write + std::io::Seek>(
    writer: &mut ZipWriter<W>,
    name: &str,
    bytes: &[u8],
) -> Result<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(name, options)?;
    writer
        .write_all(bytes)
        .map_err(|e| StyleguardError::package(format!("cannot write '{}': {}", name, e)))
}

/// `.<file name>.<uuid>.tmp` in the destination's directory.
fn temp_sibling(destination: &Path) -> Result<PathBuf> {
    let file_name = destination
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            StyleguardError::package(format!(
                "destination '{}' has no file name",
                destination.display()
            ))
        })?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4())))
}
