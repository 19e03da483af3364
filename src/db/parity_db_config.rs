// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

/// `ParityDb` configuration exposed in the config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, smart_default::SmartDefault)]
#[serde(default)]
pub struct ParityDbConfig {
    pub enable_statistics: bool,
    #[default("lz4".into())]
    pub compression_type: String,
}

impl ParityDbConfig {
    pub(in crate::db) fn compression(&self) -> anyhow::Result<parity_db::CompressionType> {
        match self.compression_type.to_lowercase().as_str() {
            "none" => Ok(parity_db::CompressionType::NoCompression),
            "lz4" => Ok(parity_db::CompressionType::Lz4),
            "snappy" => Ok(parity_db::CompressionType::Snappy),
            other => anyhow::bail!("unsupported compression type: {other}"),
        }
    }
}
