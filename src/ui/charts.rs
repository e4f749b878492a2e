//! Dashboard charts and the slot → live chart table.
//!
//! A chart handle is an owned resource of the rendering backend. The registry
//! holds at most one handle per slot and always destroys the old handle before
//! a replacement is created.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::models::StatsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartSlot {
    Rating,
    Genre,
    TopItems,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub background_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
}

/// Bar chart description handed to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub labels: Vec<String>,
    pub dataset: Dataset,
    /// Axis the categories run along; `Y` draws horizontal bars
    pub index_axis: Axis,
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,
    /// Decimal places in tooltips
    pub tooltip_decimals: usize,
}

pub fn rating_chart(stats: &StatsSnapshot) -> ChartConfig {
    let dist = &stats.rating_distribution;
    ChartConfig {
        kind: "bar",
        labels: dist.bin_labels(),
        dataset: Dataset {
            label: "Movies",
            data: dist.counts.iter().map(|&c| c as f64).collect(),
            background_color: "rgba(34, 211, 238, 0.6)",
            border_color: Some("rgba(34, 211, 238, 0.9)"),
            border_width: Some(1),
        },
        index_axis: Axis::X,
        begin_at_zero: true,
        value_max: None,
        tooltip_decimals: 0,
    }
}

pub fn genre_chart(stats: &StatsSnapshot) -> ChartConfig {
    ChartConfig {
        kind: "bar",
        labels: stats.genre_counts.labels.clone(),
        dataset: Dataset {
            label: "Frequency",
            data: stats.genre_counts.counts.iter().map(|&c| c as f64).collect(),
            background_color: "rgba(94, 234, 212, 0.7)",
            border_color: None,
            border_width: None,
        },
        index_axis: Axis::Y,
        begin_at_zero: true,
        value_max: None,
        tooltip_decimals: 0,
    }
}

pub fn top_items_chart(stats: &StatsSnapshot) -> ChartConfig {
    ChartConfig {
        kind: "bar",
        labels: stats.top_items.titles.clone(),
        dataset: Dataset {
            label: "Rating",
            data: stats.top_items.ratings.clone(),
            background_color: "rgba(251, 191, 36, 0.7)",
            border_color: None,
            border_width: None,
        },
        index_axis: Axis::X,
        begin_at_zero: true,
        value_max: Some(10.0),
        tooltip_decimals: 1,
    }
}

/// A live chart owned by the registry
pub trait ChartHandle {
    /// Releases the chart's resources in the rendering backend
    fn destroy(self);
}

/// Creates charts in some rendering surface
pub trait ChartBackend {
    type Handle: ChartHandle;

    fn create(&mut self, slot: ChartSlot, config: &ChartConfig) -> Self::Handle;
}

pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    live: HashMap<ChartSlot, B::Handle>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            live: HashMap::new(),
        }
    }

    /// Destroys the slot's current chart, if any, then creates the new one
    pub fn render(&mut self, slot: ChartSlot, config: &ChartConfig) {
        if let Some(previous) = self.live.remove(&slot) {
            previous.destroy();
        }
        let handle = self.backend.create(slot, config);
        self.live.insert(slot, handle);
    }

    pub fn is_live(&self, slot: ChartSlot) -> bool {
        self.live.contains_key(&slot)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn destroy_all(&mut self) {
        for (_, handle) in self.live.drain() {
            handle.destroy();
        }
    }
}

impl<B: ChartBackend> Drop for ChartRegistry<B> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[derive(Debug, Default)]
struct ChartLedger {
    next_id: u64,
    live: Vec<(u64, ChartSlot, ChartConfig)>,
    created: usize,
    destroyed: usize,
}

/// Backend that keeps charts in memory; clones share the same ledger
#[derive(Debug, Clone, Default)]
pub struct MemoryChartBackend {
    ledger: Arc<Mutex<ChartLedger>>,
}

pub struct MemoryChart {
    id: u64,
    ledger: Arc<Mutex<ChartLedger>>,
}

impl ChartHandle for MemoryChart {
    fn destroy(self) {
        if let Ok(mut ledger) = self.ledger.lock() {
            ledger.live.retain(|(id, _, _)| *id != self.id);
            ledger.destroyed += 1;
        }
    }
}

impl ChartBackend for MemoryChartBackend {
    type Handle = MemoryChart;

    fn create(&mut self, slot: ChartSlot, config: &ChartConfig) -> MemoryChart {
        let id = match self.ledger.lock() {
            Ok(mut ledger) => {
                ledger.next_id += 1;
                let id = ledger.next_id;
                ledger.live.push((id, slot, config.clone()));
                ledger.created += 1;
                id
            }
            Err(_) => 0,
        };
        MemoryChart {
            id,
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl MemoryChartBackend {
    pub fn live_count(&self, slot: ChartSlot) -> usize {
        self.ledger
            .lock()
            .map(|l| l.live.iter().filter(|(_, s, _)| *s == slot).count())
            .unwrap_or(0)
    }

    pub fn live_total(&self) -> usize {
        self.ledger.lock().map(|l| l.live.len()).unwrap_or(0)
    }

    pub fn created(&self) -> usize {
        self.ledger.lock().map(|l| l.created).unwrap_or(0)
    }

    pub fn destroyed(&self) -> usize {
        self.ledger.lock().map(|l| l.destroyed).unwrap_or(0)
    }

    /// Configs of the charts currently on screen
    pub fn live_charts(&self) -> Vec<(ChartSlot, ChartConfig)> {
        self.ledger
            .lock()
            .map(|l| l.live.iter().map(|(_, s, c)| (*s, c.clone())).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenreCounts, RatingDistribution, TopItems};

    fn stats() -> StatsSnapshot {
        StatsSnapshot {
            rating_distribution: RatingDistribution {
                bins: vec![0.0, 5.0, 10.0],
                counts: vec![2, 3],
            },
            genre_counts: GenreCounts {
                labels: vec!["Drama".to_string()],
                counts: vec![4],
            },
            top_items: TopItems {
                titles: vec!["Heat".to_string()],
                ratings: vec![7.9],
            },
            heatmap: None,
        }
    }

    #[test]
    fn test_chart_encodings() {
        let stats = stats();

        let rating = rating_chart(&stats);
        assert_eq!(rating.labels, vec!["0.0 - 5.0", "5.0 - 10.0"]);
        assert_eq!(rating.dataset.data, vec![2.0, 3.0]);

        let genre = genre_chart(&stats);
        assert_eq!(genre.index_axis, Axis::Y);

        let top = top_items_chart(&stats);
        assert_eq!(top.value_max, Some(10.0));
        assert_eq!(top.tooltip_decimals, 1);
    }

    #[test]
    fn test_config_serializes_like_a_chart_definition() {
        let json = serde_json::to_value(genre_chart(&stats())).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["indexAxis"], "y");
        assert_eq!(json["dataset"]["backgroundColor"], "rgba(94, 234, 212, 0.7)");
        assert!(json["dataset"].get("borderColor").is_none());
    }

    #[test]
    fn test_registry_replaces_instead_of_stacking() {
        let backend = MemoryChartBackend::default();
        let mut registry = ChartRegistry::new(backend.clone());
        let config = rating_chart(&stats());

        registry.render(ChartSlot::Rating, &config);
        registry.render(ChartSlot::Rating, &config);
        registry.render(ChartSlot::Genre, &config);

        assert_eq!(backend.live_count(ChartSlot::Rating), 1);
        assert_eq!(backend.live_count(ChartSlot::Genre), 1);
        assert_eq!(backend.created(), 3);
        assert_eq!(backend.destroyed(), 1);
        assert!(registry.is_live(ChartSlot::Rating));
        assert!(!registry.is_live(ChartSlot::TopItems));
    }

    #[test]
    fn test_dropping_registry_releases_charts() {
        let backend = MemoryChartBackend::default();
        {
            let mut registry = ChartRegistry::new(backend.clone());
            registry.render(ChartSlot::TopItems, &top_items_chart(&stats()));
            assert_eq!(backend.live_total(), 1);
        }
        assert_eq!(backend.live_total(), 0);
    }
}
