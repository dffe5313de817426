//! Batch checksumming of named inputs such as uploaded files.
//!
//! Each item is checksummed independently with the same engine and the records come back in input
//! order. Which text feeds the checksum is the caller's choice: the raw content, or the item name
//! concatenated with its decimal size (a cheap fingerprint that never reads the content).
//!
//! With the `parallel` feature enabled the items are processed on the rayon thread pool.

use crate::cs::ecc::checksum::ChecksumEngine;
use crate::cs::ecc::Result;
use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// What part of a batch item is fed to the checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumSource {
    /// Every content byte is one addend
    #[default]
    Content,
    /// The text `name + size`, e.g. `report.pdf1024`
    NameAndSize,
}

impl Display for ChecksumSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumSource::Content => f.write_str("content"),
            ChecksumSource::NameAndSize => f.write_str("name+size"),
        }
    }
}

/// One named input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub name: String,
    pub size: u64,
    pub content: Vec<u8>,
}

impl BatchItem {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Reads a file into an item named after its final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }
}

/// Checksum of one batch item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub name: String,
    pub size: u64,
    pub source: ChecksumSource,
    pub checksum: String,
}

fn checksum_item(engine: &ChecksumEngine, item: &BatchItem, source: ChecksumSource) -> BatchRecord {
    let checksum = match source {
        ChecksumSource::Content => engine.compute_bytes(&item.content),
        ChecksumSource::NameAndSize => engine.compute(&format!("{}{}", item.name, item.size)),
    };
    debug!("{} ({} bytes, {}): {}", item.name, item.size, source, checksum);

    BatchRecord {
        name: item.name.clone(),
        size: item.size,
        source,
        checksum,
    }
}

/// Checksums every item with `engine`, preserving input order.
pub fn checksum_batch(
    engine: &ChecksumEngine,
    items: &[BatchItem],
    source: ChecksumSource,
) -> Vec<BatchRecord> {
    #[cfg(feature = "parallel")]
    let records: Vec<BatchRecord> = items
        .par_iter()
        .map(|item| checksum_item(engine, item, source))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let records: Vec<BatchRecord> = items
        .iter()
        .map(|item| checksum_item(engine, item, source))
        .collect();

    info!(
        "checksummed {} item(s) by {} with {}",
        records.len(),
        source,
        engine
    );
    records
}
