// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Share retrieval from peers.

mod client;
mod getter;
mod metrics;
mod peers;

pub use client::{RequestError, ShareClient, ShareRequest};
pub use getter::{Getter, GetterConfig, GetterError};
pub use peers::{PeerPool, PeerPools, PoolKind};

#[cfg(test)]
pub use client::test_utils;
