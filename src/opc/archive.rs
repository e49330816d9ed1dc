//! Named-entry store backed by a ZIP container

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

const CONTENT_TYPES_ENTRY: &str = "[Content_Types].xml";

/// In-memory archive: entry name -> bytes.
///
/// Names are forward-slash paths without a leading '/'. A name maps to at most
/// one entry; writing an existing name replaces its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Vec<u8>>,
    compression: CompressionMethod,
}

impl Archive {
    /// Create a new empty archive
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            compression: CompressionMethod::Deflated,
        }
    }

    /// Open an archive from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open an archive from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open an archive from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut zip =
            ZipArchive::new(reader).map_err(|e| Error::CorruptArchive(e.to_string()))?;
        let mut archive = Self::new();

        for i in 0..zip.len() {
            let mut file = zip
                .by_index(i)
                .map_err(|e| Error::CorruptArchive(e.to_string()))?;

            // Skip directories
            if file.is_dir() {
                continue;
            }

            let name = normalize(file.name()).to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data)
                .map_err(|e| Error::CorruptArchive(format!("{}: {}", name, e)))?;
            archive.entries.insert(name, data);
        }

        Ok(archive)
    }

    /// Set the compression method used when serializing
    pub fn set_compression(&mut self, method: CompressionMethod) {
        self.compression = method;
    }

    /// Check whether an entry exists
    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(normalize(name))
    }

    /// Get the raw bytes of an entry
    pub fn read_bytes(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(normalize(name)).map(Vec::as_slice)
    }

    /// Get an entry as UTF-8 text
    pub fn read_text(&self, name: &str) -> Result<Option<&str>> {
        match self.read_bytes(name) {
            Some(bytes) => Ok(Some(std::str::from_utf8(strip_bom(bytes))?)),
            None => Ok(None),
        }
    }

    /// Insert or replace an entry
    pub fn write(&mut self, name: &str, data: impl Into<Vec<u8>>) {
        let name = normalize(name);
        // Drop the old entry first so a name never carries two payloads
        self.entries.remove(name);
        self.entries.insert(name.to_string(), data.into());
    }

    /// Remove an entry; returns whether it existed
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(normalize(name)).is_some()
    }

    /// Entry names, `[Content_Types].xml` first
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.entries.len());
        if self.entries.contains_key(CONTENT_TYPES_ENTRY) {
            names.push(CONTENT_TYPES_ENTRY);
        }
        names.extend(
            self.entries
                .keys()
                .map(String::as_str)
                .filter(|name| *name != CONTENT_TYPES_ENTRY),
        );
        names
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Save the archive to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let bytes = self.to_bytes()?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize the archive to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        for name in self.list() {
            zip.start_file(name, options)?;
            zip.write_all(&self.entries[name])?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> &str {
    name.trim_start_matches('/')
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}
