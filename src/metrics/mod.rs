//! Metrics provider interface and snapshot types.
//!
//! The sampling engine consumes OS counters through [`MetricsProvider`] so
//! the platform backends stay swappable and the engine stays testable with a
//! mock. Readings are assumed fast and non-blocking; every fallible call
//! returns a `Result` and a failed reading never aborts a tick.

use serde::{Deserialize, Serialize};

use crate::error::Result;

mod gpu;
mod platform;

pub use gpu::GpuBackend;
pub use platform::PlatformProvider;

/// Whether a GPU backend is present. Checked once at startup instead of
/// guarding every call site with error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuCapability {
    Supported,
    Unsupported,
}

/// Virtual memory snapshot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub percent: f64,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

/// Filesystem usage for one mount.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiskUsage {
    pub percent: f64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub total_bytes: u64,
}

/// Cumulative disk I/O counters, summed over physical devices.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IoCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Cumulative network I/O counters, summed over non-loopback interfaces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One GPU device reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuDevice {
    pub name: String,
    /// Load in percent (0-100)
    pub load_percent: f64,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub temperature_c: Option<f64>,
}

/// Physical and logical core counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CoreCounts {
    pub physical: usize,
    pub logical: usize,
}

/// Static host identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostInfo {
    pub os_name: String,
    pub os_release: String,
    pub hostname: String,
}

/// Source of instantaneous readings and cumulative counters.
pub trait MetricsProvider {
    /// System-wide CPU utilization in percent since the previous call.
    /// The first call primes internal state and reports 0.
    fn cpu_percent(&mut self) -> Result<f64>;

    /// Current CPU frequency in MHz, if the platform exposes one.
    fn cpu_frequency_mhz(&mut self) -> Result<Option<f64>>;

    fn cpu_core_counts(&self) -> CoreCounts;

    fn memory(&mut self) -> Result<MemoryInfo>;

    /// Usage for the filesystem containing `path`. A missing path yields
    /// [`EmonError::PathUnavailable`](crate::EmonError::PathUnavailable) so
    /// the caller can fall back to a secondary root.
    fn disk_usage(&mut self, path: &str) -> Result<DiskUsage>;

    fn disk_io_counters(&mut self) -> Result<IoCounters>;

    fn net_io_counters(&mut self) -> Result<NetCounters>;

    /// Boot time as seconds since the Unix epoch.
    fn boot_time(&self) -> Result<u64>;

    /// Number of processes currently alive on the host.
    fn process_count(&mut self) -> Result<usize>;

    /// GPU backend presence, probed once at startup.
    fn gpu_capability(&self) -> GpuCapability;

    /// Readings for every GPU device. Only meaningful when
    /// [`gpu_capability`](Self::gpu_capability) is `Supported`.
    fn gpu_snapshot(&mut self) -> Result<Vec<GpuDevice>>;

    fn host_info(&self) -> HostInfo;
}
