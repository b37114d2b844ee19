use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_store")]
    pub store: StoreBackend,
    #[serde(default = "default_profile_image")]
    pub default_profile_image: String,
}

fn default_port() -> u16 { 3000 }
fn default_mongodb_uri() -> String { "mongodb://localhost:27017".into() }
fn default_database() -> String { "soulverse".into() }
fn default_store() -> StoreBackend { StoreBackend::Mongo }
fn default_profile_image() -> String { "https://soulverse.boo.world/images/1.png".into() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            mongodb_uri: default_mongodb_uri(),
            database: default_database(),
            store: default_store(),
            default_profile_image: default_profile_image(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_source(config::Environment::with_prefix("SOULVERSE_PROFILE").separator("__"))
    }

    fn from_source<S>(source: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder().add_source(source).build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("SOULVERSE_PROFILE")
            .separator("__")
            .source(Some(source))
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = AppConfig::from_source(env(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreBackend::Mongo);
        assert_eq!(config.database, "soulverse");
        assert_eq!(config.default_profile_image, "https://soulverse.boo.world/images/1.png");
    }

    #[test]
    fn env_overrides_fields() {
        let config = AppConfig::from_source(env(&[
            ("SOULVERSE_PROFILE__PORT", "8081"),
            ("SOULVERSE_PROFILE__STORE", "memory"),
            ("SOULVERSE_PROFILE__DATABASE", "test_db"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.database, "test_db");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(AppConfig::from_source(env(&[("SOULVERSE_PROFILE__STORE", "sqlite")])).is_err());
    }
}
