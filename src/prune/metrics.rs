// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use prometheus_client::metrics::{counter::Counter, gauge::Gauge, histogram::Histogram};
use std::sync::LazyLock;

pub static LAST_PRUNED_HEIGHT: LazyLock<Gauge> = LazyLock::new(|| {
    let metric = Gauge::default();
    crate::metrics::default_registry().register(
        "pruner_last_pruned_height",
        "Highest height confirmed pruned",
        metric.clone(),
    );
    metric
});
pub static FAILED_HEIGHTS: LazyLock<Gauge> = LazyLock::new(|| {
    let metric = Gauge::default();
    crate::metrics::default_registry().register(
        "pruner_failed_heights",
        "Number of heights waiting for their deletion to be retried",
        metric.clone(),
    );
    metric
});
pub static PRUNED_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let metric = Counter::default();
    crate::metrics::default_registry().register(
        "pruner_pruned",
        "Total number of heights whose block data was deleted",
        metric.clone(),
    );
    metric
});
pub static CYCLE_FAILURES_TOTAL: LazyLock<Counter> = LazyLock::new(|| {
    let metric = Counter::default();
    crate::metrics::default_registry().register(
        "pruner_cycle_failures",
        "Total number of pruning cycles that could not complete",
        metric.clone(),
    );
    metric
});
pub static CYCLE_TIME: LazyLock<Histogram> = LazyLock::new(|| {
    let metric = crate::metrics::default_histogram();
    crate::metrics::default_registry().register(
        "pruner_cycle_time",
        "Duration of a pruning cycle in seconds",
        metric.clone(),
    );
    metric
});
