//! Server configuration.
//!
//! Read from an optional `campusnet.toml` and then from `CAMPUSNET__*`
//! environment variables, e.g. `CAMPUSNET__NEO4J__URI` or
//! `CAMPUSNET__RELATIONS__ENDPOINTS=strict`.

use campusnet_core::RelationPolicy;
use campusnet_graph::GraphConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub neo4j: GraphConfig,
    pub relations: RelationPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load from `<file_prefix>.toml` (if present) overlaid with the environment.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUSNET")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusnet_core::{DuplicatePolicy, EndpointPolicy};
    use config::{Config, File, FileFormat};

    #[test]
    fn missing_file_yields_defaults() {
        let config = AppConfig::load("no-such-campusnet-config").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.relations, RelationPolicy::default());
    }

    #[test]
    fn toml_sections_override_defaults() {
        let toml = r#"
            [server]
            port = 8080

            [neo4j]
            uri = "bolt://graph.internal:7687"

            [relations]
            endpoints = "strict"
            duplicates = "merge"
        "#;
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.neo4j.uri, "bolt://graph.internal:7687");
        assert_eq!(config.neo4j.password, "password");
        assert_eq!(config.relations.endpoints, EndpointPolicy::Strict);
        assert_eq!(config.relations.duplicates, DuplicatePolicy::Merge);
    }
}
