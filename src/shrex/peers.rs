// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ahash::HashMap;
use libp2p::PeerId;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Named peer pools a node keeps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PoolKind {
    /// Peers serving the availability window. May have pruned older data.
    Full,
    /// Peers advertising archival retention.
    Archival,
}

#[derive(Debug, Default, Clone)]
struct PeerInfo {
    successes: u64,
    // reset by a success
    consecutive_failures: u32,
    average_time: Duration,
}

impl PeerInfo {
    fn record_time(&mut self, time: Duration) {
        // exponential moving average, new samples weigh a fifth
        self.average_time = if self.average_time.is_zero() {
            time
        } else {
            (self.average_time * 4 + time) / 5
        };
    }
}

/// Thread safe set of peers used for share requests, with per-peer request
/// outcomes.
#[derive(Debug)]
pub struct PeerPool {
    kind: PoolKind,
    peers: RwLock<HashMap<PeerId, PeerInfo>>,
}

impl PeerPool {
    pub fn new(kind: PoolKind) -> Self {
        Self {
            kind,
            peers: Default::default(),
        }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    /// Adds a peer. Returns false if it was already known.
    pub fn add_peer(&self, peer: PeerId) -> bool {
        let mut peers = self.peers.write();
        if peers.contains_key(&peer) {
            return false;
        }
        debug!(pool = %self.kind, %peer, "added peer");
        peers.insert(peer, PeerInfo::default());
        true
    }

    /// Removes a peer and returns true if it was present.
    pub fn remove_peer(&self, peer: &PeerId) -> bool {
        self.peers.write().remove(peer).is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    /// Picks a peer to send a request to, preferring peers whose last
    /// requests did not fail.
    pub fn pick_peer(&self) -> Option<PeerId> {
        self.top_peers_shuffled().into_iter().next()
    }

    /// All peers, those with fewer consecutive failures first. Peers with the
    /// same record are shuffled.
    pub fn top_peers_shuffled(&self) -> Vec<PeerId> {
        let mut peers = self
            .peers
            .read()
            .iter()
            .map(|(peer, info)| (*peer, info.consecutive_failures))
            .collect::<Vec<_>>();
        peers.shuffle(&mut rand::thread_rng());
        peers.sort_by_key(|(_, failures)| *failures);
        peers.into_iter().map(|(peer, _)| peer).collect()
    }

    /// Logs a successful request. Unknown peers are ignored.
    pub fn log_success(&self, peer: PeerId, time: Duration) {
        if let Some(info) = self.peers.write().get_mut(&peer) {
            info.successes += 1;
            info.consecutive_failures = 0;
            info.record_time(time);
        }
    }

    /// Logs a failed or timed out request. Unknown peers are ignored.
    pub fn log_failure(&self, peer: PeerId, time: Duration) {
        if let Some(info) = self.peers.write().get_mut(&peer) {
            info.consecutive_failures = info.consecutive_failures.saturating_add(1);
            info.record_time(time);
        }
    }

    pub fn average_time(&self, peer: &PeerId) -> Option<Duration> {
        self.peers.read().get(peer).map(|info| info.average_time)
    }
}

/// The pools share requests are routed to.
#[derive(Debug, Clone)]
pub struct PeerPools {
    full: Arc<PeerPool>,
    archival: Arc<PeerPool>,
}

impl Default for PeerPools {
    fn default() -> Self {
        Self {
            full: Arc::new(PeerPool::new(PoolKind::Full)),
            archival: Arc::new(PeerPool::new(PoolKind::Archival)),
        }
    }
}

impl PeerPools {
    pub fn get(&self, kind: PoolKind) -> &Arc<PeerPool> {
        match kind {
            PoolKind::Full => &self.full,
            PoolKind::Archival => &self.archival,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[test]
    fn pools_by_name() {
        let pools = PeerPools::default();
        for kind in PoolKind::iter() {
            assert_eq!(pools.get(kind).kind(), kind);
            assert_eq!(PoolKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert_eq!(PoolKind::from_str("archival").unwrap(), PoolKind::Archival);
    }

    #[test]
    fn add_and_remove() {
        let pool = PeerPool::new(PoolKind::Full);
        assert_eq!(pool.pick_peer(), None);
        let peer = PeerId::random();
        assert!(pool.add_peer(peer));
        assert!(!pool.add_peer(peer));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pick_peer(), Some(peer));
        assert!(pool.remove_peer(&peer));
        assert!(!pool.remove_peer(&peer));
        assert!(pool.is_empty());
    }

    #[test]
    fn failing_peers_go_last() {
        let pool = PeerPool::new(PoolKind::Archival);
        let peers = (0..4).map(|_| PeerId::random()).collect::<Vec<_>>();
        for peer in &peers {
            pool.add_peer(*peer);
        }
        pool.log_failure(peers[0], Duration::from_millis(5));
        pool.log_failure(peers[0], Duration::from_millis(5));
        pool.log_failure(peers[1], Duration::from_millis(5));

        for _ in 0..10 {
            let ordered = pool.top_peers_shuffled();
            assert_eq!(ordered.len(), 4);
            assert_eq!(&ordered[2..], &[peers[1], peers[0]]);
            assert_ne!(pool.pick_peer(), Some(peers[0]));
        }

        // a success clears the streak
        pool.log_success(peers[0], Duration::from_millis(5));
        assert_ne!(pool.top_peers_shuffled().last(), Some(&peers[0]));
    }

    #[test]
    fn average_time_tracks_requests() {
        let pool = PeerPool::new(PoolKind::Full);
        let peer = PeerId::random();
        pool.add_peer(peer);
        pool.log_success(peer, Duration::from_millis(100));
        assert_eq!(pool.average_time(&peer), Some(Duration::from_millis(100)));
        pool.log_success(peer, Duration::from_millis(600));
        assert_eq!(pool.average_time(&peer), Some(Duration::from_millis(200)));
        // unknown peers are not added by logging
        pool.log_failure(PeerId::random(), Duration::ZERO);
        assert_eq!(pool.len(), 1);
    }
}
