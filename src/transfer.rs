//! Combined export of both levels to one file, and import that partitions a
//! combined file back into the two levels.

use eyre::{eyre, Result};
use log::debug;
use std::fs;
use std::path::Path;

use crate::cfg::alias::{Alias, Level};
use crate::cfg::store::AliasSet;
use crate::error::ErrorContext;

/// Write global aliases followed by user aliases to `path`; returns the count written
pub fn export_all(path: &Path, user: &AliasSet, global: &AliasSet) -> Result<usize> {
    let combined: Vec<&Alias> = global.iter().chain(user.iter()).collect();
    let content = serde_json::to_string_pretty(&combined)
        .map_err(|e| eyre!(ErrorContext::new("processing export data").to_serialize_error(e)))?;
    fs::write(path, content).map_err(|e| {
        eyre!(ErrorContext::new("writing export file").with_file(path).to_file_operation_error(e))
    })?;
    debug!("Exported {} aliases to {:?}", combined.len(), path);
    Ok(combined.len())
}

/// Read an exported file as a flat list of records
pub fn read_import(path: &Path) -> Result<Vec<Alias>> {
    let content = fs::read_to_string(path).map_err(|e| {
        eyre!(ErrorContext::new("reading import file").with_file(path).to_file_operation_error(e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        eyre!(ErrorContext::new("parsing import file").with_file(path).to_parse_error(&e))
    })
}

/// Split imported records into (user, global) by their `level` field
pub fn partition(records: Vec<Alias>) -> (AliasSet, AliasSet) {
    let (global, user): (Vec<Alias>, Vec<Alias>) = records
        .into_iter()
        .partition(|alias| alias.level == Level::Global);
    (user.into_iter().collect(), global.into_iter().collect())
}
