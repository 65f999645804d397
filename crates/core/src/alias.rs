//! Alias management
//!
//! Aliases are named bucket profiles: the bucket, its data-center location
//! and the access key used to sign requests against it.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::endpoint::DEFAULT_DOMAIN;
use crate::error::{Error, Result};

/// Name used when neither `--alias` nor a configured default is given
pub const DEFAULT_ALIAS: &str = "default";

/// A named bucket profile
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Unique name for this alias
    pub name: String,

    /// Bucket name
    pub bucket: String,

    /// Data-center location, e.g. `oss-cn-hangzhou`
    pub location: String,

    /// Access key ID
    pub access_key_id: String,

    /// Access key secret
    pub access_key_secret: String,

    /// Domain appended to `bucket.location`
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Use https
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure: bool,
}

fn default_domain() -> String {
    DEFAULT_DOMAIN.to_string()
}

fn default_true() -> bool {
    true
}

impl Alias {
    /// Create a new alias with required fields
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        location: impl Into<String>,
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            bucket: bucket.into(),
            location: location.into(),
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            domain: default_domain(),
            secure: true,
            insecure: false,
        }
    }
}

impl std::fmt::Debug for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alias")
            .field("name", &self.name)
            .field("bucket", &self.bucket)
            .field("location", &self.location)
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("domain", &self.domain)
            .field("secure", &self.secure)
            .field("insecure", &self.insecure)
            .finish()
    }
}

/// Manager for alias operations
pub struct AliasManager {
    config_manager: ConfigManager,
}

impl AliasManager {
    /// Create a new AliasManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new AliasManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured aliases
    pub fn list(&self) -> Result<Vec<Alias>> {
        let config = self.config_manager.load()?;
        Ok(config.aliases)
    }

    /// Get an alias by name
    pub fn get(&self, name: &str) -> Result<Alias> {
        let config = self.config_manager.load()?;
        config
            .aliases
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    /// Resolve the alias a command should use
    ///
    /// An explicit name wins, then the configured default alias, then
    /// [`DEFAULT_ALIAS`].
    pub fn resolve(&self, explicit: Option<&str>) -> Result<Alias> {
        if let Some(name) = explicit {
            return self.get(name);
        }
        let config = self.config_manager.load()?;
        let name = config
            .defaults
            .alias
            .unwrap_or_else(|| DEFAULT_ALIAS.to_string());
        config
            .aliases
            .into_iter()
            .find(|a| a.name == name)
            .ok_or(Error::AliasNotFound(name))
    }

    /// Add or update an alias
    pub fn set(&self, alias: Alias) -> Result<()> {
        let mut config = self.config_manager.load()?;

        // Remove existing alias with same name
        config.aliases.retain(|a| a.name != alias.name);
        config.aliases.push(alias);

        self.config_manager.save(&config)
    }

    /// Remove an alias
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.aliases.len();

        config.aliases.retain(|a| a.name != name);

        if config.aliases.len() == original_len {
            return Err(Error::AliasNotFound(name.to_string()));
        }

        if config.defaults.alias.as_deref() == Some(name) {
            config.defaults.alias = None;
        }

        self.config_manager.save(&config)
    }

    /// Check if an alias exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.aliases.iter().any(|a| a.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn temp_alias_manager() -> (AliasManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_manager = ConfigManager::with_path(config_path);
        let alias_manager = AliasManager::with_config_manager(config_manager);
        (alias_manager, temp_dir)
    }

    fn alias(name: &str, bucket: &str) -> Alias {
        Alias::new(name, bucket, "oss-cn-hangzhou", "AK", "SK")
    }

    #[test]
    fn test_alias_new() {
        let alias = alias("test", "media");
        assert_eq!(alias.name, "test");
        assert_eq!(alias.bucket, "media");
        assert_eq!(alias.domain, "aliyuncs.com");
        assert!(alias.secure);
        assert!(!alias.insecure);
    }

    #[test]
    fn test_alias_debug_hides_secret() {
        let debug = format!("{:?}", Alias::new("a", "b", "c", "id", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_alias_manager_set_and_get() {
        let (manager, _temp_dir) = temp_alias_manager();

        manager.set(alias("prod", "media")).unwrap();

        let retrieved = manager.get("prod").unwrap();
        assert_eq!(retrieved.name, "prod");
        assert_eq!(retrieved.bucket, "media");
    }

    #[test]
    fn test_alias_manager_list() {
        let (manager, _temp_dir) = temp_alias_manager();

        manager.set(alias("a", "one")).unwrap();
        manager.set(alias("b", "two")).unwrap();

        let aliases = manager.list().unwrap();
        assert_eq!(aliases.len(), 2);
    }

    #[test]
    fn test_alias_manager_remove() {
        let (manager, _temp_dir) = temp_alias_manager();

        manager.set(alias("test", "media")).unwrap();
        assert!(manager.exists("test").unwrap());

        manager.remove("test").unwrap();
        assert!(!manager.exists("test").unwrap());
    }

    #[test]
    fn test_alias_manager_remove_not_found() {
        let (manager, _temp_dir) = temp_alias_manager();

        let result = manager.remove("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::AliasNotFound(_)));
    }

    #[test]
    fn test_alias_manager_get_not_found() {
        let (manager, _temp_dir) = temp_alias_manager();

        let result = manager.get("nonexistent");
        assert!(matches!(result.unwrap_err(), Error::AliasNotFound(_)));
    }

    #[test]
    fn test_alias_update_existing() {
        let (manager, _temp_dir) = temp_alias_manager();

        manager.set(alias("test", "old")).unwrap();
        manager.set(alias("test", "new")).unwrap();

        let aliases = manager.list().unwrap();
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0].bucket, "new");
    }

    #[test]
    fn test_resolve_order() {
        let temp_dir = TempDir::new().unwrap();
        let config_manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));

        let mut config = Config::default();
        config.aliases.push(alias(DEFAULT_ALIAS, "fallback"));
        config.aliases.push(alias("staging", "stage"));
        config.aliases.push(alias("prod", "media"));
        config_manager.save(&config).unwrap();

        let manager = AliasManager::with_config_manager(config_manager);
        assert_eq!(manager.resolve(None).unwrap().bucket, "fallback");
        assert_eq!(manager.resolve(Some("prod")).unwrap().bucket, "media");

        config.defaults.alias = Some("staging".into());
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
            .save(&config)
            .unwrap();
        assert_eq!(manager.resolve(None).unwrap().bucket, "stage");
    }

    #[test]
    fn test_remove_clears_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.aliases.push(alias("prod", "media"));
        config.defaults.alias = Some("prod".into());
        ConfigManager::with_path(path.clone()).save(&config).unwrap();

        let manager = AliasManager::with_config_manager(ConfigManager::with_path(path.clone()));
        manager.remove("prod").unwrap();

        let config = ConfigManager::with_path(path).load().unwrap();
        assert!(config.defaults.alias.is_none());
    }

    #[test]
    fn test_missing_optional_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            schema_version = 1

            [[aliases]]
            name = "old"
            bucket = "b"
            location = "oss-cn-beijing"
            access_key_id = "id"
            access_key_secret = "secret"
            "#,
        )
        .unwrap();

        let manager = AliasManager::with_config_manager(ConfigManager::with_path(path));
        let alias = manager.get("old").unwrap();
        assert_eq!(alias.domain, "aliyuncs.com");
        assert!(alias.secure);
        assert!(!alias.insecure);
    }
}
