//! The narrow interface the core exposes to its rendering collaborator.
//!
//! Sampling and overlay logic never touch widgets directly: they push
//! geometry, immutable history snapshots, and label text through
//! [`OverlaySurface`], so both sides stay independently testable.

use crate::channel::ChannelKey;

/// Key identifying one text widget on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    /// CPU utilization percent
    CpuUsage,
    /// Current CPU frequency
    CpuFreq,
    /// Physical/logical core counts
    CpuCores,
    /// Memory utilization percent
    MemUsage,
    /// Used / total memory
    MemDetail,
    /// Disk usage percent
    DiskUsage,
    /// Read/write rates
    DiskRw,
    /// Free disk space
    DiskFree,
    /// Up/down network rates
    NetSpeed,
    /// Cumulative sent/received totals
    NetTotal,
    /// GPU device summary (or the capability placeholder)
    GpuInfo,
    /// OS name and release
    SysOs,
    /// Hostname
    SysHost,
    /// Formatted uptime
    SysUptime,
    /// Expanded-mode detail row for a panel
    Detail(ChannelKey),
    /// Pin indicator
    Pin,
}

/// Rendering collaborator consumed by the sampling engine and the overlay
/// controller. Implemented by the GUI; tests use a recording fake.
pub trait OverlaySurface {
    /// Move/resize the overlay window.
    fn set_geometry(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Redraw one channel's chart from an immutable history snapshot
    /// (oldest first).
    fn render_channel(&mut self, key: ChannelKey, series: &[f64]);

    /// Update one text widget.
    fn set_label(&mut self, key: LabelKey, text: &str);
}
