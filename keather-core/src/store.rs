//! Local persistence of the last selected city.

use anyhow::{Context, Result, anyhow};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::config::project_dirs;

/// Key under which the last selected city is stored.
pub const LAST_CITY_KEY: &str = "lastCity";

pub trait PreferenceStore: Send + Sync + Debug {
    /// Persist `city`, replacing any previous value.
    fn save(&self, city: &str) -> Result<()>;

    /// The previously saved city, if any.
    fn load(&self) -> Result<Option<String>>;
}

/// String preferences kept in a small TOML file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn save(&self, city: &str) -> Result<()> {
        // A corrupt file must not block saving; it is replaced wholesale.
        let mut values = self.read_all().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Discarding unreadable preferences");
            BTreeMap::new()
        });
        values.insert(LAST_CITY_KEY.to_string(), city.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&values).context("Failed to serialize preferences")?;

        // Write next to the target and rename over it so a crash mid-write
        // leaves the previous file intact.
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, toml)
            .with_context(|| format!("Failed to write preferences: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace preferences: {}", self.path.display()))?;

        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(LAST_CITY_KEY))
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(city: &str) -> Self {
        let store = Self::default();
        if let Ok(mut values) = store.values.lock() {
            values.insert(LAST_CITY_KEY.to_string(), city.to_string());
        }
        store
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn save(&self, city: &str) -> Result<()> {
        self.values
            .lock()
            .map_err(|_| anyhow!("Preference store lock poisoned"))?
            .insert(LAST_CITY_KEY.to_string(), city.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Preference store lock poisoned"))?;
        Ok(values.get(LAST_CITY_KEY).cloned())
    }
}
