//! Remembers the last successfully searched city across runs.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

pub trait LastCityStore: Send + Sync + Debug {
    /// Overwrite the single persisted slot.
    fn record_last_city(&self, city: &str) -> Result<()>;

    fn read_last_city(&self) -> Result<Option<String>>;
}

impl<T: LastCityStore + ?Sized> LastCityStore for Box<T> {
    fn record_last_city(&self, city: &str) -> Result<()> {
        (**self).record_last_city(city)
    }

    fn read_last_city(&self) -> Result<Option<String>> {
        (**self).read_last_city()
    }
}

/// On-disk layout of the state file.
///
/// ```toml
/// last_city = "Paris"
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    last_city: Option<String>,
}

/// Stores the city in `state.toml` under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileCityStore {
    path: PathBuf,
}

impl FileCityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default platform location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Self::state_file_path()?))
    }

    pub fn state_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "citywx", "citywx")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("state.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LastCityStore for FileCityStore {
    fn record_last_city(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let state = StateFile {
            last_city: Some(city.to_string()),
        };
        let toml = toml::to_string(&state).context("Failed to serialize state to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }

    fn read_last_city(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;

        let state: StateFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;

        Ok(state.last_city.filter(|city| !city.trim().is_empty()))
    }
}

/// Keeps the city for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryCityStore {
    city: Mutex<Option<String>>,
}

impl MemoryCityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(city: impl Into<String>) -> Self {
        Self {
            city: Mutex::new(Some(city.into())),
        }
    }
}

impl LastCityStore for MemoryCityStore {
    fn record_last_city(&self, city: &str) -> Result<()> {
        let mut slot = self
            .city
            .lock()
            .map_err(|_| anyhow!("last city store lock poisoned"))?;
        *slot = Some(city.to_string());
        Ok(())
    }

    fn read_last_city(&self) -> Result<Option<String>> {
        let slot = self
            .city
            .lock()
            .map_err(|_| anyhow!("last city store lock poisoned"))?;
        Ok(slot.clone())
    }
}
