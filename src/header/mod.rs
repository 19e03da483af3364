// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod memory;

pub use memory::MemoryHeaderStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::SystemTime;

/// The parts of an extended header that retention logic cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    height: u64,
    time: SystemTime,
}

impl Header {
    pub fn new(height: u64, time: SystemTime) -> Self {
        Self { height, time }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Block time as reported by consensus.
    pub fn time(&self) -> SystemTime {
        self.time
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("header at height {0} not found")]
    NotFound(u64),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Read access to the locally synced header chain.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// Returns the header at `height` if it is already known locally.
    async fn get_by_height(&self, height: u64) -> Result<Header, HeaderError>;

    /// Blocks until the header at `height` is synced.
    async fn wait_for_height(&self, height: u64) -> Result<Header, HeaderError>;

    /// The highest locally known header.
    async fn head(&self) -> Result<Header, HeaderError>;
}

#[async_trait]
impl<T: ?Sized + HeaderSource> HeaderSource for Arc<T> {
    async fn get_by_height(&self, height: u64) -> Result<Header, HeaderError> {
        self.as_ref().get_by_height(height).await
    }

    async fn wait_for_height(&self, height: u64) -> Result<Header, HeaderError> {
        self.as_ref().wait_for_height(height).await
    }

    async fn head(&self) -> Result<Header, HeaderError> {
        self.as_ref().head().await
    }
}
