//! Configuration providers.
//!
//! Settings are grouped by namespace (a top level TOML table) and key. Consumers
//! receive a [`ConfigProvider`] rather than looking up a global store, so any
//! backing store (a file on disk, an in-memory table in tests) can be injected.

use std::path::{Path, PathBuf};

use eyre::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Read-only access to namespaced configuration values.
pub trait ConfigProvider {
    /// Look up the raw value stored under `namespace.key`.
    fn get_value(&self, namespace: &str, key: &str) -> Option<toml::Value>;

    /// Look up `namespace.key` and deserialise it, falling back to `default`
    /// when the value is missing or does not have the expected shape.
    fn get<T>(&self, namespace: &str, key: &str, default: T) -> T
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let Some(value) = self.get_value(namespace, key) else {
            tracing::debug!(%namespace, %key, "no configuration value, using default");
            return default;
        };

        match value.try_into::<T>() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, %namespace, %key, "invalid configuration value, using default");
                default
            }
        }
    }
}

impl<C> ConfigProvider for &C
where
    C: ConfigProvider + ?Sized,
{
    fn get_value(&self, namespace: &str, key: &str) -> Option<toml::Value> {
        (**self).get_value(namespace, key)
    }
}

impl<C> ConfigProvider for Box<C>
where
    C: ConfigProvider + ?Sized,
{
    fn get_value(&self, namespace: &str, key: &str) -> Option<toml::Value> {
        (**self).get_value(namespace, key)
    }
}

fn lookup(table: &toml::Table, namespace: &str, key: &str) -> Option<toml::Value> {
    table
        .get(namespace)
        .and_then(|ns| ns.as_table())
        .and_then(|ns| ns.get(key))
        .cloned()
}

/// Configuration backed by a TOML file.
#[derive(Debug)]
pub struct FileConfig {
    path: PathBuf,
    table: toml::Table,
}

impl FileConfig {
    /// The per-user configuration file, e.g. `~/.config/bplist/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bplist").join("config.toml"))
    }

    /// Load the configuration at `path`.
    ///
    /// A missing file is an empty configuration. A file that cannot be read or
    /// parsed is an error.
    pub fn load(path: impl Into<PathBuf>) -> eyre::Result<Self> {
        let path = path.into();
        let table = read_table(&path)?;
        Ok(Self { path, table })
    }

    /// Re-read the file from disk, picking up changes made by other processes.
    pub fn reload(&mut self) -> eyre::Result<()> {
        self.table = read_table(&self.path).wrap_err("reloading configuration")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfig {
    fn get_value(&self, namespace: &str, key: &str) -> Option<toml::Value> {
        lookup(&self.table, namespace, key)
    }
}

#[tracing::instrument(skip_all, fields(path = %path.display()))]
fn read_table(path: &Path) -> eyre::Result<toml::Table> {
    if !path.exists() {
        tracing::debug!("configuration file does not exist, using empty configuration");
        return Ok(toml::Table::new());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading configuration file {}", path.display()))?;
    let table = toml::from_str(&contents)
        .with_context(|| format!("parsing configuration file {}", path.display()))?;
    tracing::debug!("configuration loaded");
    Ok(table)
}

/// Configuration held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfig {
    table: toml::Table,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `namespace.key`, replacing any previous value.
    pub fn set(&mut self, namespace: &str, key: &str, value: impl Serialize) -> eyre::Result<()> {
        let value = toml::Value::try_from(value).wrap_err("serialising configuration value")?;
        self.set_value(namespace, key, value);
        Ok(())
    }

    pub fn set_value(&mut self, namespace: &str, key: &str, value: toml::Value) {
        let ns = self
            .table
            .entry(namespace.to_string())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if !ns.is_table() {
            *ns = toml::Value::Table(toml::Table::new());
        }
        if let toml::Value::Table(ns) = ns {
            ns.insert(key.to_string(), value);
        }
    }

    pub fn remove(&mut self, namespace: &str, key: &str) -> Option<toml::Value> {
        self.table
            .get_mut(namespace)
            .and_then(|ns| ns.as_table_mut())
            .and_then(|ns| ns.remove(key))
    }
}

impl ConfigProvider for MemoryConfig {
    fn get_value(&self, namespace: &str, key: &str) -> Option<toml::Value> {
        lookup(&self.table, namespace, key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load(dir.path().join("config.toml")).unwrap();

        assert!(config.get_value("run", "breakpoints").is_none());
        let value: BTreeMap<String, u32> = config.get("run", "breakpoints", BTreeMap::new());
        assert!(value.is_empty());
    }

    #[test]
    fn reads_namespaced_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlocale = \"fr\"\n").unwrap();

        let config = FileConfig::load(&path).unwrap();

        assert_eq!(config.get("ui", "locale", String::new()), "fr");
        assert_eq!(config.get("ui", "missing", "en".to_string()), "en");
        assert_eq!(config.get("other", "locale", "en".to_string()), "en");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\nlocale = ").unwrap();

        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn wrong_shape_falls_back_to_default() {
        let mut config = MemoryConfig::new();
        config.set("run", "breakpoints", "not a table").unwrap();

        let value: BTreeMap<String, Vec<u32>> = config.get("run", "breakpoints", BTreeMap::new());
        assert!(value.is_empty());
    }

    #[test]
    fn reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nlocale = \"de\"\n").unwrap();

        let mut config = FileConfig::load(&path).unwrap();
        assert_eq!(config.get("ui", "locale", String::new()), "de");

        std::fs::write(&path, "[ui]\nlocale = \"es\"\n").unwrap();
        config.reload().unwrap();
        assert_eq!(config.get("ui", "locale", String::new()), "es");
    }

    #[test]
    fn memory_config_set_and_remove() {
        let mut config = MemoryConfig::new();
        config.set("run", "count", 3u32).unwrap();
        assert_eq!(config.get("run", "count", 0u32), 3);

        assert!(config.remove("run", "count").is_some());
        assert_eq!(config.get("run", "count", 0u32), 0);
    }

    #[test]
    fn providers_behind_references() {
        let mut config = MemoryConfig::new();
        config.set("run", "count", 7u32).unwrap();

        let boxed: Box<dyn ConfigProvider> = Box::new(config.clone());
        assert_eq!(boxed.get("run", "count", 0u32), 7);
        assert_eq!((&config).get("run", "count", 0u32), 7);
    }
}
