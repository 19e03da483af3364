// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::availability::RetentionMode;
use crate::db::db_engine::DbConfig;
use crate::node::NodeType;
use crate::prune::PrunerConfig;
use crate::shrex::GetterConfig;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use tracing::level_filters::LevelFilter;

#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogValue {
    pub module: String,
    #[serde_as(as = "DisplayFromStr")]
    pub level: LevelFilter,
}

impl LogValue {
    pub fn new(module: &str, level: LevelFilter) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogConfig {
    pub filters: Vec<LogValue>,
}

impl LogConfig {
    pub(in crate::cli_shared) fn to_filter_string(&self) -> String {
        self.filters
            .iter()
            .map(|f| format!("{}={}", f.module, f.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filters: vec![
                LogValue::new("libp2p_swarm", LevelFilter::WARN),
                LogValue::new("parity_db", LevelFilter::WARN),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct NodeConfig {
    pub node_type: NodeType,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Retention mode of bridge and full nodes. Light nodes always prune.
    pub mode: RetentionMode,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub node: NodeConfig,
    pub availability: AvailabilityConfig,
    pub pruner: PrunerConfig,
    pub getter: GetterConfig,
    pub parity_db: DbConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn db_config(&self) -> &DbConfig {
        &self.parity_db
    }

    /// The retention mode the node actually runs under.
    pub fn retention_mode(&self) -> RetentionMode {
        match self.node.node_type {
            NodeType::Light => RetentionMode::Pruned,
            NodeType::Bridge | NodeType::Full => self.availability.mode,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_config_all_params_under_section() {
        let serialized_config = toml::to_string(&Config::default()).unwrap();
        assert_eq!(serialized_config.trim_start().chars().next(), Some('['));
        let parsed: Config = toml::from_str(&serialized_config).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [node]
            node_type = "bridge"

            [availability]
            mode = "pruned"

            [pruner]
            availability_window = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.node.node_type, NodeType::Bridge);
        assert_eq!(config.retention_mode(), RetentionMode::Pruned);
        assert_eq!(config.pruner.availability_window, Duration::from_millis(1));
        assert_eq!(config.pruner.interval, PrunerConfig::default().interval);
        assert_eq!(config.getter, GetterConfig::default());
    }

    #[test]
    fn test_light_nodes_always_prune() {
        let mut config = Config::default();
        config.node.node_type = NodeType::Light;
        config.availability.mode = RetentionMode::Archival;
        assert_eq!(config.retention_mode(), RetentionMode::Pruned);
    }

    #[test]
    fn test_default_log_filters() {
        let config = LogConfig::default();
        EnvFilter::builder()
            .parse(config.to_filter_string())
            .unwrap();
    }
}
