//! In-memory ZIP assembly for generated artifacts.
//!
//! The archive is a single mutable resource owned by the build loop: opened
//! at run start, append-only while the run is in flight, finalized exactly
//! once. Entry order is insertion order. Entry timestamps are pinned to the
//! ZIP epoch so identical inputs produce byte-identical archives.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use pageforge_shared::{PageForgeError, Result};

/// Metadata recorded for each entry written into the archive.
#[derive(Debug, Clone)]
pub struct EntryMeta {
    /// Entry file name within the archive.
    pub name: String,
    /// Uncompressed size in bytes.
    pub size: usize,
    /// SHA-256 hex digest of the uncompressed content.
    pub content_hash: String,
}

/// A finalized archive: the deflated byte buffer plus its entry log.
#[derive(Debug, Clone)]
pub struct FinishedArchive {
    /// The complete ZIP byte stream, ready for download or writing to disk.
    pub bytes: Vec<u8>,
    /// Entries in write order.
    pub entries: Vec<EntryMeta>,
}

/// Append-only writer accumulating deflate-compressed entries in memory.
pub struct ArchiveWriter {
    inner: ZipWriter<Cursor<Vec<u8>>>,
    entries: Vec<EntryMeta>,
    names: HashSet<String>,
}

impl ArchiveWriter {
    /// Open a fresh in-memory archive.
    pub fn new() -> Self {
        Self {
            inner: ZipWriter::new(Cursor::new(Vec::new())),
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    fn file_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default())
    }

    /// Append one entry.
    ///
    /// Returns `true` when `name` was already present: the new entry is still
    /// written (later entries shadow earlier ones for readers that resolve by
    /// name), but the caller should surface the collision as a warning.
    pub fn add_entry(&mut self, name: &str, content: &[u8]) -> Result<bool> {
        let duplicate = !self.names.insert(name.to_string());
        if duplicate {
            warn!(name, "duplicate archive entry name, earlier entry is shadowed");
        }

        self.inner
            .start_file(name, Self::file_options())
            .map_err(|e| PageForgeError::Archive(format!("cannot start entry '{name}': {e}")))?;
        self.inner
            .write_all(content)
            .map_err(|e| PageForgeError::Archive(format!("cannot write entry '{name}': {e}")))?;

        let content_hash = {
            let mut hasher = Sha256::new();
            hasher.update(content);
            format!("{:x}", hasher.finalize())
        };

        debug!(name, size = content.len(), "archive entry written");
        self.entries.push(EntryMeta {
            name: name.to_string(),
            size: content.len(),
            content_hash,
        });

        Ok(duplicate)
    }

    /// Number of entries written so far.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Finalize the archive, closing it for writes.
    pub fn finish(self) -> Result<FinishedArchive> {
        let cursor = self
            .inner
            .finish()
            .map_err(|e| PageForgeError::Archive(format!("cannot finalize archive: {e}")))?;

        Ok(FinishedArchive {
            bytes: cursor.into_inner(),
            entries: self.entries,
        })
    }
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn entries_roundtrip_in_write_order() {
        let mut writer = ArchiveWriter::new();
        writer.add_entry("a.html", b"<p>a</p>").unwrap();
        writer.add_entry("a.html.json", b"{}").unwrap();
        writer.add_entry("b.html", b"<p>b</p>").unwrap();

        let finished = writer.finish().unwrap();
        assert_eq!(finished.entries.len(), 3);
        assert_eq!(
            entry_names(&finished.bytes),
            vec!["a.html", "a.html.json", "b.html"]
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(finished.bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name("b.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<p>b</p>");
    }

    #[test]
    fn duplicate_names_are_flagged_but_written() {
        let mut writer = ArchiveWriter::new();
        assert!(!writer.add_entry("x.html", b"first").unwrap());
        assert!(writer.add_entry("x.html", b"second").unwrap());
        assert_eq!(writer.entry_count(), 2);
    }

    #[test]
    fn entry_meta_records_size_and_hash() {
        let mut writer = ArchiveWriter::new();
        writer.add_entry("a.html", b"hello").unwrap();
        let finished = writer.finish().unwrap();

        let meta = &finished.entries[0];
        assert_eq!(meta.size, 5);
        // SHA-256 of "hello"
        assert_eq!(
            meta.content_hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn identical_inputs_yield_identical_bytes() {
        let build = || {
            let mut writer = ArchiveWriter::new();
            writer.add_entry("a.html", b"<p>a</p>").unwrap();
            writer.add_entry("a.html.json", b"{\"slug\": \"a\"}").unwrap();
            writer.finish().unwrap().bytes
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn empty_archive_finalizes() {
        let finished = ArchiveWriter::new().finish().unwrap();
        assert!(finished.entries.is_empty());
        assert_eq!(entry_names(&finished.bytes).len(), 0);
    }
}
