use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::export::collaborators::{ArchiveEntry, Archiver, CollaboratorError};

/// Name of the manifest written by [`DirectoryArchiver`].
pub const MANIFEST: &str = "manifest.json";

/// Archives entries by copying them into a directory next to a
/// `manifest.json` listing their file names, formats and master flags.
///
/// Entries are stored under their file name, which must be unique within
/// the archive and must not collide with the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryArchiver;

/// Content of an archive manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ArchiveEntry>,
}

impl Manifest {
    /// Reads the manifest of an archive directory.
    pub fn read(archive: &Path) -> Result<Self, CollaboratorError> {
        let file = File::open(archive.join(MANIFEST))?;
        Ok(serde_json::from_reader(file)?)
    }

    /// The master entry, if any.
    pub fn master(&self) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.master)
    }
}

impl Archiver for DirectoryArchiver {
    fn archive(
        &self,
        entries: &[ArchiveEntry],
        destination: &Path,
    ) -> Result<PathBuf, CollaboratorError> {
        if entries.iter().filter(|entry| entry.master).count() > 1 {
            return Err("an archive can have at most one master entry".into());
        }

        let file_names = archive_names(entries)?;
        fs::create_dir_all(destination)?;

        let mut manifest = Manifest {
            entries: Vec::with_capacity(entries.len()),
        };

        for (entry, file_name) in entries.iter().zip(file_names) {
            fs::copy(&entry.location, destination.join(file_name))?;
            debug!(
                "Archived '{}' into '{}'",
                entry.location.display(),
                destination.display()
            );

            manifest.entries.push(ArchiveEntry {
                location: PathBuf::from(file_name),
                ..entry.clone()
            });
        }

        let file = File::create(destination.join(MANIFEST))?;
        serde_json::to_writer_pretty(file, &manifest)?;

        Ok(destination.to_path_buf())
    }
}

/// File names of the entries inside the archive.
fn archive_names(entries: &[ArchiveEntry]) -> Result<Vec<&OsStr>, CollaboratorError> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(entries.len());

    for entry in entries {
        let file_name = entry
            .location
            .file_name()
            .ok_or_else(|| format!("'{}' is not a file", entry.location.display()))?;

        if file_name == MANIFEST || !seen.insert(file_name) {
            return Err(format!(
                "'{}' clashes with another file in the archive",
                entry.location.display()
            )
            .into());
        }
        names.push(file_name);
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let model_path = dir.path().join("model.json");
        let notes_path = dir.path().join("notes.md");
        fs::write(&model_path, "{}").expect("Failed to write model");
        fs::write(&notes_path, "# Notes").expect("Failed to write notes");

        let destination = dir.path().join("archive");
        let archive = DirectoryArchiver
            .archive(
                &[
                    ArchiveEntry::new(&model_path, "application/json", true),
                    ArchiveEntry::new(&notes_path, "text/markdown", false),
                ],
                &destination,
            )
            .expect("Failed to archive");

        assert!(archive.join("model.json").exists());
        assert!(archive.join("notes.md").exists());

        let manifest = Manifest::read(&archive).expect("Failed to read manifest");
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(
            manifest.master().map(|entry| entry.location.clone()),
            Some(PathBuf::from("model.json"))
        );
    }

    #[test]
    fn test_multiple_masters() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let entries = [
            ArchiveEntry::new("a.json", "application/json", true),
            ArchiveEntry::new("b.json", "application/json", true),
        ];

        assert!(DirectoryArchiver
            .archive(&entries, &dir.path().join("archive"))
            .is_err());
    }

    #[test]
    fn test_clashing_file_names() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        for (folder, content) in [("a", "MASTER"), ("b", "OTHER")] {
            fs::create_dir(dir.path().join(folder)).expect("Failed to create folder");
            fs::write(dir.path().join(folder).join("model.json"), content)
                .expect("Failed to write file");
        }
        fs::write(dir.path().join(MANIFEST), "{}").expect("Failed to write file");

        let destination = dir.path().join("archive");
        let master = ArchiveEntry::new(dir.path().join("a/model.json"), "application/json", true);

        for clashing in [dir.path().join("b/model.json"), dir.path().join(MANIFEST)] {
            let result = DirectoryArchiver.archive(
                &[
                    master.clone(),
                    ArchiveEntry::new(clashing, "application/json", false),
                ],
                &destination,
            );
            assert!(result.is_err());
        }

        // Nothing is copied once a clash is found
        assert!(!destination.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("a/model.json")).expect("Failed to read file"),
            "MASTER"
        );
    }
}
