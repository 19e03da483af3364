// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use async_trait::async_trait;
use bytes::Bytes;
use libp2p::PeerId;
use std::ops::Range;
use std::sync::Arc;

/// The part of a block's data a caller wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareRequest {
    /// The whole extended data square.
    Eds,
    /// A byte range of the extended data square.
    Range(Range<usize>),
}

impl ShareRequest {
    /// Extracts the requested part from a block's full data. `None` when the
    /// range lies outside of it.
    pub fn select(&self, data: &Bytes) -> Option<Bytes> {
        match self {
            Self::Eds => Some(data.clone()),
            Self::Range(range) if range.start <= range.end && range.end <= data.len() => {
                Some(data.slice(range.clone()))
            }
            Self::Range(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,
    #[error("peer does not have the requested data")]
    NotFound,
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Client side of the share exchange protocol.
#[async_trait]
pub trait ShareClient: Send + Sync {
    async fn request(
        &self,
        peer: PeerId,
        height: u64,
        request: &ShareRequest,
    ) -> Result<Bytes, RequestError>;
}

#[async_trait]
impl<T: ?Sized + ShareClient> ShareClient for Arc<T> {
    async fn request(
        &self,
        peer: PeerId,
        height: u64,
        request: &ShareRequest,
    ) -> Result<Bytes, RequestError> {
        self.as_ref().request(peer, height, request).await
    }
}
