//! Sound bank manifest parsing
//!
//! Reads the `SoundbanksInfo.json` manifest produced by the middleware's
//! bank generator. [`BankCatalog`] lists the banks and their events,
//! [`BusCatalog`] lists the auxiliary buses of the init bank. Both are
//! loaded once at startup and then only read by UI code.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Errors that can occur while reading a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest is missing key {0}")]
    MissingKey(&'static str),

    #[error("SoundBanks is not an array")]
    NotAnArray,
}

/// A bank and the events it packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankInfo {
    pub name: String,
    pub events: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BankEntry {
    #[serde(rename = "ShortName")]
    short_name: String,
    /// Anything but an array counts as no events
    #[serde(rename = "Events", default)]
    events: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BusEntry {
    #[serde(rename = "Name")]
    name: String,
}

/// Locate the `SoundBanksInfo.SoundBanks` array
fn sound_banks(document: &Value) -> Result<&Vec<Value>, ManifestError> {
    document
        .get("SoundBanksInfo")
        .ok_or(ManifestError::MissingKey("SoundBanksInfo"))?
        .get("SoundBanks")
        .ok_or(ManifestError::MissingKey("SoundBanks"))?
        .as_array()
        .ok_or(ManifestError::NotAnArray)
}

fn read_document(path: &Path) -> Result<Value, ManifestError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Event entries are either `{ "Name": .. }` objects or bare strings
fn event_name(event: &Value) -> Option<String> {
    match event {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => fields
            .get("Name")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Banks discovered in the manifest, keyed by name
#[derive(Debug, Default, Clone)]
pub struct BankCatalog {
    banks: BTreeMap<String, BankInfo>,
}

impl BankCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the bank table from a manifest file.
    ///
    /// On error the current table is left untouched.
    pub fn load_manifest(&mut self, path: impl AsRef<Path>) -> Result<usize, ManifestError> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading bank manifest");
        let document = read_document(path)?;
        self.replace_from(&document)
    }

    /// Same as [`BankCatalog::load_manifest`] for manifest text already in memory
    pub fn parse_manifest(&mut self, json: &str) -> Result<usize, ManifestError> {
        let document: Value = serde_json::from_str(json)?;
        self.replace_from(&document)
    }

    fn replace_from(&mut self, document: &Value) -> Result<usize, ManifestError> {
        let mut banks = BTreeMap::new();

        for entry in sound_banks(document)? {
            let entry: BankEntry = match BankEntry::deserialize(entry) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed bank entry");
                    continue;
                }
            };

            if banks.contains_key(&entry.short_name) {
                warn!(bank = %entry.short_name, "Duplicate bank in manifest, keeping the first");
                continue;
            }

            let events: Vec<String> = match entry.events.as_ref().and_then(Value::as_array) {
                Some(events) => events.iter().filter_map(event_name).collect(),
                None => Vec::new(),
            };
            banks.insert(
                entry.short_name.clone(),
                BankInfo {
                    name: entry.short_name,
                    events,
                },
            );
        }

        let count = banks.len();
        self.banks = banks;
        info!(banks = count, "Bank catalog loaded");
        Ok(count)
    }

    pub fn bank(&self, name: &str) -> Option<&BankInfo> {
        self.banks.get(name)
    }

    /// Banks in name order
    pub fn banks(&self) -> impl Iterator<Item = &BankInfo> {
        self.banks.values()
    }

    pub fn bank_names(&self) -> Vec<&str> {
        self.banks.keys().map(String::as_str).collect()
    }

    /// The bank packaging `event`, if any
    pub fn find_event(&self, event: &str) -> Option<&BankInfo> {
        self.banks
            .values()
            .find(|bank| bank.events.iter().any(|e| e == event))
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

/// Auxiliary bus names available as zone targets.
///
/// Names are kept in manifest order and are not deduplicated.
#[derive(Debug, Default, Clone)]
pub struct BusCatalog {
    names: Vec<String>,
}

impl BusCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the `AuxBusses` of the init bank from a manifest file.
    ///
    /// Entries naming another bank are skipped; entries without a
    /// `ShortName` are still walked. On error the current list is left
    /// untouched.
    pub fn discover_buses(
        &mut self,
        path: impl AsRef<Path>,
        init_bank_name: &str,
    ) -> Result<usize, ManifestError> {
        let document = read_document(path.as_ref())?;
        self.replace_from(&document, init_bank_name)
    }

    /// Same as [`BusCatalog::discover_buses`] for manifest text already in memory
    pub fn parse_manifest(
        &mut self,
        json: &str,
        init_bank_name: &str,
    ) -> Result<usize, ManifestError> {
        let document: Value = serde_json::from_str(json)?;
        self.replace_from(&document, init_bank_name)
    }

    fn replace_from(
        &mut self,
        document: &Value,
        init_bank_name: &str,
    ) -> Result<usize, ManifestError> {
        let mut names = Vec::new();

        for entry in sound_banks(document)? {
            let Some(busses) = entry.get("AuxBusses") else {
                continue;
            };
            if let Some(short_name) = entry.get("ShortName") {
                if short_name.as_str() != Some(init_bank_name) {
                    continue;
                }
            }

            let Some(busses) = busses.as_array() else {
                continue;
            };
            names.extend(
                busses
                    .iter()
                    .filter_map(|bus| BusEntry::deserialize(bus).ok())
                    .map(|bus| bus.name),
            );
        }

        let count = names.len();
        self.names = names;
        info!(buses = count, "Aux bus catalog loaded");
        Ok(count)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
