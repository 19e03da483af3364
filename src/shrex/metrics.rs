// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use prometheus_client::metrics::counter::Counter;
use std::sync::LazyLock;

pub static ARCHIVAL_REQUESTS_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let metric = Counter::default();
    crate::metrics::default_registry().register(
        "getter_archival_requests",
        "Number of fetches routed to the archival peer pool",
        metric.clone(),
    );
    metric
});
pub static NOT_AVAILABLE_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let metric = Counter::default();
    crate::metrics::default_registry().register(
        "getter_not_available",
        "Number of fetches no archival peer could serve",
        metric.clone(),
    );
    metric
});
