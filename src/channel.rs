//! Bounded rolling histories for the sparkline displays.
//!
//! Each monitored metric owns one [`MetricChannel`]: a fixed-capacity FIFO of
//! scalar samples, oldest first. The effective capacity depends on the panel
//! layout mode; switching modes never truncates existing history, it only
//! bounds future appends.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Panel layout mode. Selects window geometry and channel capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelMode {
    /// Small edge widget, single visible panel
    Compact,
    /// Task-manager style multi-panel layout
    Expanded,
}

impl PanelMode {
    /// The other mode (expand button toggles between the two).
    pub fn toggled(self) -> Self {
        match self {
            PanelMode::Compact => PanelMode::Expanded,
            PanelMode::Expanded => PanelMode::Compact,
        }
    }
}

/// Key identifying one metric channel / dashboard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKey {
    /// CPU utilization (percent)
    Cpu,
    /// Memory utilization (percent)
    Memory,
    /// Combined disk read+write activity (MB/s)
    Disk,
    /// Combined network up+down throughput (MB/s)
    Network,
    /// GPU load (percent; constant zero when no backend)
    Gpu,
    /// Host uptime (hours)
    System,
}

impl ChannelKey {
    /// All channels in display order.
    pub const ALL: [ChannelKey; 6] = [
        ChannelKey::Cpu,
        ChannelKey::Memory,
        ChannelKey::Disk,
        ChannelKey::Network,
        ChannelKey::Gpu,
        ChannelKey::System,
    ];
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(spec(*self).title)
    }
}

/// Static descriptor for one channel: display text plus capacity by mode.
///
/// The sampling engine processes these generically; adding a metric means
/// adding a descriptor, not another hand-rolled update block.
#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub key: ChannelKey,
    pub title: &'static str,
    pub unit: &'static str,
    pub compact_capacity: usize,
    pub expanded_capacity: usize,
}

/// Channel table in display order.
pub const CHANNEL_SPECS: [ChannelSpec; 6] = [
    ChannelSpec {
        key: ChannelKey::Cpu,
        title: "CPU",
        unit: "%",
        compact_capacity: 30,
        expanded_capacity: 120,
    },
    ChannelSpec {
        key: ChannelKey::Memory,
        title: "Memory",
        unit: "%",
        compact_capacity: 30,
        expanded_capacity: 120,
    },
    ChannelSpec {
        key: ChannelKey::Disk,
        title: "Disk",
        unit: "MB/s",
        compact_capacity: 30,
        expanded_capacity: 60,
    },
    ChannelSpec {
        key: ChannelKey::Network,
        title: "Network",
        unit: "MB/s",
        compact_capacity: 30,
        expanded_capacity: 120,
    },
    ChannelSpec {
        key: ChannelKey::Gpu,
        title: "GPU",
        unit: "%",
        compact_capacity: 30,
        expanded_capacity: 120,
    },
    ChannelSpec {
        key: ChannelKey::System,
        title: "System",
        unit: "h",
        compact_capacity: 24,
        expanded_capacity: 24,
    },
];

/// Descriptor for a channel key.
pub fn spec(key: ChannelKey) -> &'static ChannelSpec {
    CHANNEL_SPECS
        .iter()
        .find(|s| s.key == key)
        .expect("descriptor table covers every key")
}

/// Bounded rolling history of a single scalar series.
///
/// Single writer (the sampling engine), single reader (the render step),
/// both on the same control flow — no synchronization needed.
#[derive(Debug, Clone)]
pub struct MetricChannel {
    key: ChannelKey,
    compact_capacity: usize,
    expanded_capacity: usize,
    capacity: usize,
    history: VecDeque<f64>,
}

impl MetricChannel {
    /// Create an empty channel starting in compact capacity.
    pub fn new(key: ChannelKey, compact_capacity: usize, expanded_capacity: usize) -> Self {
        Self {
            key,
            compact_capacity,
            expanded_capacity,
            capacity: compact_capacity,
            history: VecDeque::with_capacity(expanded_capacity),
        }
    }

    pub fn from_spec(spec: &ChannelSpec) -> Self {
        Self::new(spec.key, spec.compact_capacity, spec.expanded_capacity)
    }

    pub fn key(&self) -> ChannelKey {
        self.key
    }

    /// Capacity currently in effect.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Most recent sample, if any.
    pub fn last(&self) -> Option<f64> {
        self.history.back().copied()
    }

    /// Append a sample, evicting the oldest entries past capacity.
    pub fn append(&mut self, value: f64) {
        self.history.push_back(value);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Immutable copy of the history, oldest first, for rendering.
    pub fn snapshot(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    /// Switch the effective capacity. Existing history is not truncated;
    /// only future appends are bound by the new limit.
    pub fn set_mode(&mut self, mode: PanelMode) {
        self.capacity = match mode {
            PanelMode::Compact => self.compact_capacity,
            PanelMode::Expanded => self.expanded_capacity,
        };
    }
}

/// The full set of channels, created once at startup.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    channels: Vec<MetricChannel>,
}

impl ChannelSet {
    /// Build one channel per descriptor in [`CHANNEL_SPECS`].
    pub fn new() -> Self {
        Self {
            channels: CHANNEL_SPECS.iter().map(MetricChannel::from_spec).collect(),
        }
    }

    pub fn get(&self, key: ChannelKey) -> &MetricChannel {
        self.channels
            .iter()
            .find(|c| c.key() == key)
            .expect("channel set covers every key")
    }

    pub fn get_mut(&mut self, key: ChannelKey) -> &mut MetricChannel {
        self.channels
            .iter_mut()
            .find(|c| c.key() == key)
            .expect("channel set covers every key")
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricChannel> {
        self.channels.iter()
    }

    /// Apply a layout mode's capacities to every channel.
    pub fn set_mode(&mut self, mode: PanelMode) {
        for channel in &mut self.channels {
            channel.set_mode(mode);
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_within_capacity() {
        let mut ch = MetricChannel::new(ChannelKey::Cpu, 5, 10);
        for i in 0..5 {
            ch.append(i as f64);
        }
        assert_eq!(ch.len(), 5);
        assert_eq!(ch.snapshot(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_append_evicts_oldest_fifo() {
        let mut ch = MetricChannel::new(ChannelKey::Cpu, 3, 10);
        for i in 0..5 {
            ch.append(i as f64);
        }
        assert_eq!(ch.snapshot(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut ch = MetricChannel::new(ChannelKey::Network, 30, 120);
        for i in 0..500 {
            ch.append(i as f64);
            assert!(ch.len() <= ch.capacity());
        }
    }

    #[test]
    fn test_thirty_one_appends_evict_first() {
        let mut ch = MetricChannel::new(ChannelKey::Cpu, 30, 120);
        ch.append(42.0);
        for _ in 0..30 {
            ch.append(7.0);
        }
        assert_eq!(ch.len(), 30);
        assert!(!ch.snapshot().contains(&42.0));
    }

    #[test]
    fn test_mode_switch_does_not_truncate() {
        let mut ch = MetricChannel::new(ChannelKey::Cpu, 30, 120);
        for i in 0..120 {
            ch.append(i as f64);
        }
        // Grown under expanded capacity
        ch.set_mode(PanelMode::Expanded);
        for i in 0..120 {
            ch.append(i as f64);
        }
        assert_eq!(ch.len(), 120);

        // Back to compact: history is kept as-is...
        ch.set_mode(PanelMode::Compact);
        assert_eq!(ch.len(), 120);

        // ...and only the next append re-bounds it.
        ch.append(1.0);
        assert_eq!(ch.len(), 30);
        assert_eq!(ch.last(), Some(1.0));
    }

    #[test]
    fn test_descriptor_lookup_matches_key() {
        for key in ChannelKey::ALL {
            let s = spec(key);
            assert_eq!(s.key, key);
            assert!(!s.title.is_empty());
            assert!(!s.unit.is_empty());
            assert!(s.compact_capacity <= s.expanded_capacity);
        }
        // Display goes through the same table.
        assert_eq!(ChannelKey::Cpu.to_string(), "CPU");
        assert_eq!(ChannelKey::Gpu.to_string(), "GPU");
    }

    #[test]
    fn test_channel_set_covers_all_keys() {
        let set = ChannelSet::new();
        for key in ChannelKey::ALL {
            assert_eq!(set.get(key).key(), key);
        }
        assert_eq!(set.iter().count(), ChannelKey::ALL.len());
    }

    #[test]
    fn test_channel_set_mode_applies_everywhere() {
        let mut set = ChannelSet::new();
        set.set_mode(PanelMode::Expanded);
        assert_eq!(set.get(ChannelKey::Cpu).capacity(), 120);
        assert_eq!(set.get(ChannelKey::System).capacity(), 24);
        set.set_mode(PanelMode::Compact);
        assert_eq!(set.get(ChannelKey::Cpu).capacity(), 30);
    }
}
