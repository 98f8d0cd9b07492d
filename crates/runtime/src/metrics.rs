use std::collections::BTreeMap;

use serde::Serialize;

/// Session events worth counting.
///
/// Variant order is snapshot order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Counter {
    Cycles,
    MapRenders,
    ScatterRenders,
    RejectedTransitions,
    IgnoredEvents,
    DroppedEvents,
    ExcludedPoints,
}

impl Counter {
    pub fn name(self) -> &'static str {
        match self {
            Counter::Cycles => "cycles",
            Counter::MapRenders => "render.map",
            Counter::ScatterRenders => "render.scatter",
            Counter::RejectedTransitions => "transitions.rejected",
            Counter::IgnoredEvents => "events.ignored",
            Counter::DroppedEvents => "events.dropped",
            Counter::ExcludedPoints => "scatter.excluded",
        }
    }
}

/// Running count/sum/min/max of a per-cycle quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Spread {
    pub count: u64,
    pub sum: u64,
    pub min: u64,
    pub max: u64,
}

impl Spread {
    pub fn record(&mut self, value: u64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }
}

/// Deterministic session metrics: no clocks, sorted keys.
///
/// Two replays of the same script produce equal snapshots.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<Counter, u64>,
    scatter_points: Spread,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub scatter_points: Spread,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.counters.get(&counter).copied().unwrap_or(0)
    }

    pub fn inc(&mut self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: Counter, by: u64) {
        *self.counters.entry(counter).or_insert(0) += by;
    }

    /// Points plotted by one scatter paint.
    pub fn record_scatter_points(&mut self, points: usize) {
        self.scatter_points.record(points as u64);
    }

    pub fn scatter_points(&self) -> Spread {
        self.scatter_points
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self
                .counters
                .iter()
                .map(|(c, v)| (c.name(), *v))
                .collect(),
            scatter_points: self.scatter_points,
        }
    }
}
