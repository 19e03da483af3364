// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Retention consistency and pruning for data-availability nodes.
//!
//! A node runs either archival, keeping every block's data, or pruned,
//! discarding data that fell out of the availability window. The crate keeps
//! the two honest with each other:
//!
//! - [`availability`] remembers the mode a store ran under and refuses to turn
//!   a pruned store back into an archival one,
//! - [`prune`] deletes expired block data and persists its progress,
//! - [`shrex`] fetches block data from peers, sending requests for expired
//!   heights to archival peers only.

pub mod availability;
pub mod cli_shared;
pub mod db;
pub mod header;
pub mod metrics;
pub mod node;
pub mod prune;
pub mod shrex;
mod tool;

pub use cli_shared::cli::Config;
pub use tool::main::main as canopy_tool_main;
