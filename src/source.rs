//! Dataset sources: byte access and listing by dataset name.

use std::{collections::HashMap, fs, path::PathBuf};

use crate::error::{ListError, LoadError};

/// Read-only access to dataset files by name, e.g. `"LACity.shp"`,
/// plus the listing backing the dataset selector.
pub trait DatasetSource {
    fn get(&self, rel: &str) -> Result<Vec<u8>, LoadError>;
    fn has(&self, rel: &str) -> bool;
    /// Available dataset names, one entry per dataset.
    fn list(&self) -> Result<Vec<String>, ListError>;
}

/// One listing entry per dataset: shapefiles list by stem, sidecars are
/// skipped, GeoJSON lists by full file name.
fn dataset_name(file: &str) -> Option<String> {
    let (stem, ext) = file.rsplit_once('.')?;
    match ext {
        "shp" => Some(stem.to_string()),
        "geojson" | "json" => Some(file.to_string()),
        _ => None,
    }
}

/// Datasets stored in a local directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for DirSource {
    fn get(&self, rel: &str) -> Result<Vec<u8>, LoadError> {
        Ok(fs::read(self.root.join(rel))?)
    }

    fn has(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    fn list(&self) -> Result<Vec<String>, ListError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let file = entry?.file_name();
            if let Some(name) = dataset_name(&file.to_string_lossy()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory dataset source, keyed by file name.
#[derive(Default, Clone)]
pub struct MemSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemSource {
    pub fn new(files: HashMap<String, Vec<u8>>) -> Self {
        Self { files }
    }

    pub fn put(&mut self, name: &str, bytes: &[u8]) {
        self.files.insert(name.to_string(), bytes.to_vec());
    }
}

impl DatasetSource for MemSource {
    fn get(&self, rel: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(rel)
            .cloned()
            .ok_or_else(|| LoadError::UnknownDataset(rel.to_string()))
    }

    fn has(&self, rel: &str) -> bool {
        self.files.contains_key(rel)
    }

    fn list(&self) -> Result<Vec<String>, ListError> {
        let mut names: Vec<String> =
            self.files.keys().filter_map(|file| dataset_name(file)).collect();
        names.sort();
        Ok(names)
    }
}

/// Datasets served over HTTP: geometry files from a dataset store and
/// the listing from the stats service's `listFiles` endpoint.
#[cfg(feature = "remote")]
pub struct HttpSource {
    client: reqwest::blocking::Client,
    dataset_base: String,
    stats_base: Option<String>,
}

#[cfg(feature = "remote")]
impl HttpSource {
    pub fn new(dataset_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            dataset_base: trim_base(dataset_base.into()),
            stats_base: None,
        }
    }

    /// Stats service base URL, enabling `list()`.
    pub fn with_stats(mut self, stats_base: impl Into<String>) -> Self {
        self.stats_base = Some(trim_base(stats_base.into()));
        self
    }

    fn url(&self, rel: &str) -> String {
        format!("{}/{}", self.dataset_base, rel)
    }
}

#[cfg(feature = "remote")]
fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(feature = "remote")]
impl DatasetSource for HttpSource {
    fn get(&self, rel: &str) -> Result<Vec<u8>, LoadError> {
        let response = self.client.get(self.url(rel)).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    fn has(&self, rel: &str) -> bool {
        // Probe with HEAD; transport failures read as absent.
        self.client
            .head(self.url(rel))
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<String>, ListError> {
        let base = self
            .stats_base
            .as_ref()
            .ok_or_else(|| ListError::Unreachable("no stats service configured".into()))?;
        let names: Vec<String> = self
            .client
            .get(format!("{base}/listFiles"))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(names)
    }
}
