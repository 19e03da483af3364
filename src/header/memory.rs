// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Header, HeaderError, HeaderSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tokio::sync::watch;

/// Header chain held in memory. Headers may be appended out of order, but
/// [`HeaderSource::head`] always reports the highest one.
#[derive(Debug)]
pub struct MemoryHeaderStore {
    headers: RwLock<BTreeMap<u64, Header>>,
    head_tx: watch::Sender<u64>,
}

impl Default for MemoryHeaderStore {
    fn default() -> Self {
        let (head_tx, _) = watch::channel(0);
        Self {
            headers: Default::default(),
            head_tx,
        }
    }
}

impl MemoryHeaderStore {
    pub fn append(&self, header: Header) {
        let head = {
            let mut headers = self.headers.write();
            headers.insert(header.height(), header);
            headers.last_key_value().map(|(h, _)| *h).unwrap_or_default()
        };
        self.head_tx.send_replace(head);
    }

    pub fn len(&self) -> usize {
        self.headers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.read().is_empty()
    }
}

#[async_trait]
impl HeaderSource for MemoryHeaderStore {
    async fn get_by_height(&self, height: u64) -> Result<Header, HeaderError> {
        self.headers
            .read()
            .get(&height)
            .copied()
            .ok_or(HeaderError::NotFound(height))
    }

    async fn wait_for_height(&self, height: u64) -> Result<Header, HeaderError> {
        let mut head_rx = self.head_tx.subscribe();
        head_rx
            .wait_for(|head| *head >= height)
            .await
            .map_err(|e| HeaderError::Other(e.into()))?;
        self.get_by_height(height).await
    }

    async fn head(&self) -> Result<Header, HeaderError> {
        self.headers
            .read()
            .last_key_value()
            .map(|(_, header)| *header)
            .ok_or(HeaderError::NotFound(0))
    }
}
