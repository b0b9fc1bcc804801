//! The per-second sampling engine.
//!
//! One `tick` per interval: read the provider, convert cumulative counters to
//! rates, append to the rolling histories, and push display updates for the
//! channels that are currently visible. Channels are processed from the
//! descriptor table in [`crate::channel::CHANNEL_SPECS`]; there is no
//! per-metric update block to keep in sync.
//!
//! Failure policy: a failed reading logs at debug, keeps the previous
//! displayed value (labels are simply not rewritten, the history carries its
//! last sample forward) and never aborts the tick. GPU absence is a startup
//! capability check, not a per-tick error.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use log::debug;

use crate::channel::{ChannelKey, ChannelSet, PanelMode};
use crate::config::SamplingConfig;
use crate::metrics::{DiskUsage, GpuCapability, GpuDevice, MemoryInfo, MetricsProvider};
use crate::rate::RateCounter;
use crate::surface::{LabelKey, OverlaySurface};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// Most recent successful readings, kept for the expanded-mode detail rows.
#[derive(Default)]
struct Latest {
    cpu_freq_mhz: Option<f64>,
    memory: Option<MemoryInfo>,
    disk: Option<DiskUsage>,
    net_total_mb: Option<(f64, f64)>,
    gpus: Vec<GpuDevice>,
    boot_epoch: Option<u64>,
    process_count: Option<usize>,
}

/// Orchestrates one sampling tick per interval.
pub struct SamplingEngine<P> {
    provider: P,
    gpu: GpuCapability,
    primary_disk_path: String,
    fallback_disk_path: String,
    disk_read: Option<RateCounter>,
    disk_write: Option<RateCounter>,
    net_sent: Option<RateCounter>,
    net_recv: Option<RateCounter>,
    latest: Latest,
}

impl<P: MetricsProvider> SamplingEngine<P> {
    /// Build the engine and probe the GPU capability exactly once.
    pub fn new(provider: P, sampling: &SamplingConfig) -> Self {
        let gpu = provider.gpu_capability();
        if gpu == GpuCapability::Unsupported {
            debug!("no GPU backend, channel pinned to zero");
        }
        Self {
            provider,
            gpu,
            primary_disk_path: sampling.primary_disk_path.clone(),
            fallback_disk_path: sampling.fallback_disk_path.clone(),
            disk_read: None,
            disk_write: None,
            net_sent: None,
            net_recv: None,
            latest: Latest::default(),
        }
    }

    pub fn gpu_capability(&self) -> GpuCapability {
        self.gpu
    }

    /// Push the static labels that never change after startup.
    pub fn announce(&self, surface: &mut dyn OverlaySurface) {
        if self.gpu == GpuCapability::Unsupported {
            surface.set_label(LabelKey::GpuInfo, "GPU backend not available");
        }
        let host = self.provider.host_info();
        surface.set_label(
            LabelKey::SysOs,
            &format!("OS: {} {}", host.os_name, host.os_release),
        );
        surface.set_label(LabelKey::SysHost, &format!("Host: {}", host.hostname));
    }

    /// One sampling tick. Appends to every channel, then requests redraws
    /// for the channels visible under `mode`/`active`.
    pub fn tick(
        &mut self,
        now: Instant,
        channels: &mut ChannelSet,
        mode: PanelMode,
        active: ChannelKey,
        surface: &mut dyn OverlaySurface,
    ) {
        self.sample_cpu(channels, surface);
        self.sample_memory(channels, surface);
        self.sample_disk(now, channels, surface);
        self.sample_network(now, channels, surface);
        self.sample_gpu(channels, surface);
        self.sample_system(channels, surface);

        match mode {
            PanelMode::Compact => {
                surface.render_channel(active, &channels.get(active).snapshot());
            }
            PanelMode::Expanded => {
                for key in ChannelKey::ALL {
                    surface.render_channel(key, &channels.get(key).snapshot());
                }
                surface.set_label(LabelKey::Detail(active), &self.detail_text(active));
            }
        }
    }

    fn sample_cpu(&mut self, channels: &mut ChannelSet, surface: &mut dyn OverlaySurface) {
        match self.provider.cpu_percent() {
            Ok(pct) => {
                channels.get_mut(ChannelKey::Cpu).append(pct);
                surface.set_label(LabelKey::CpuUsage, &format!("{:.0} %", pct));
            }
            Err(e) => {
                debug!("cpu reading failed: {}", e);
                carry_forward(channels, ChannelKey::Cpu);
            }
        }
        match self.provider.cpu_frequency_mhz() {
            Ok(Some(mhz)) => {
                self.latest.cpu_freq_mhz = Some(mhz);
                surface.set_label(LabelKey::CpuFreq, &format!("Freq: {:.0} MHz", mhz));
            }
            Ok(None) => surface.set_label(LabelKey::CpuFreq, "Freq: N/A"),
            Err(e) => debug!("cpu frequency failed: {}", e),
        }
        let cores = self.provider.cpu_core_counts();
        surface.set_label(
            LabelKey::CpuCores,
            &format!("Cores: {} (L: {})", cores.physical, cores.logical),
        );
        match self.provider.process_count() {
            Ok(n) => self.latest.process_count = Some(n),
            Err(e) => debug!("process count failed: {}", e),
        }
    }

    fn sample_memory(&mut self, channels: &mut ChannelSet, surface: &mut dyn OverlaySurface) {
        match self.provider.memory() {
            Ok(mem) => {
                channels.get_mut(ChannelKey::Memory).append(mem.percent);
                surface.set_label(LabelKey::MemUsage, &format!("{:.0} %", mem.percent));
                surface.set_label(
                    LabelKey::MemDetail,
                    &format!(
                        "Used: {:.2} / {:.2} GB",
                        mem.used_bytes as f64 / GIB,
                        mem.total_bytes as f64 / GIB
                    ),
                );
                self.latest.memory = Some(mem);
            }
            Err(e) => {
                debug!("memory reading failed: {}", e);
                carry_forward(channels, ChannelKey::Memory);
            }
        }
    }

    fn sample_disk(
        &mut self,
        now: Instant,
        channels: &mut ChannelSet,
        surface: &mut dyn OverlaySurface,
    ) {
        // Usage: primary path first, then the fallback root.
        let usage = match self.provider.disk_usage(&self.primary_disk_path) {
            Ok(du) => Ok(du),
            Err(primary_err) => {
                debug!(
                    "primary disk path {} unavailable: {}",
                    self.primary_disk_path, primary_err
                );
                self.provider.disk_usage(&self.fallback_disk_path)
            }
        };
        match usage {
            Ok(du) => {
                surface.set_label(LabelKey::DiskUsage, &format!("{:.0} %", du.percent));
                surface.set_label(
                    LabelKey::DiskFree,
                    &format!("Free: {:.2} GB", du.free_bytes as f64 / GIB),
                );
                self.latest.disk = Some(du);
            }
            Err(e) => debug!("disk usage failed on both paths: {}", e),
        }

        // Throughput from the cumulative counters.
        match self.provider.disk_io_counters() {
            Ok(io) => {
                let read = advance(&mut self.disk_read, io.read_bytes, now);
                let write = advance(&mut self.disk_write, io.write_bytes, now);
                surface.set_label(
                    LabelKey::DiskRw,
                    &format!("R/W: {:.2} / {:.2} MB/s", read, write),
                );
                channels.get_mut(ChannelKey::Disk).append(read + write);
            }
            Err(e) => {
                debug!("disk counters failed: {}", e);
                carry_forward(channels, ChannelKey::Disk);
            }
        }
    }

    fn sample_network(
        &mut self,
        now: Instant,
        channels: &mut ChannelSet,
        surface: &mut dyn OverlaySurface,
    ) {
        match self.provider.net_io_counters() {
            Ok(net) => {
                let up = advance(&mut self.net_sent, net.bytes_sent, now);
                let down = advance(&mut self.net_recv, net.bytes_recv, now);
                surface.set_label(
                    LabelKey::NetSpeed,
                    &format!("\u{2191} {:.2} MB/s   \u{2193} {:.2} MB/s", up, down),
                );
                let totals = (
                    net.bytes_sent as f64 / MIB,
                    net.bytes_recv as f64 / MIB,
                );
                surface.set_label(
                    LabelKey::NetTotal,
                    &format!("Total: {:.1} / {:.1} MB", totals.0, totals.1),
                );
                self.latest.net_total_mb = Some(totals);
                channels.get_mut(ChannelKey::Network).append(up + down);
            }
            Err(e) => {
                debug!("network counters failed: {}", e);
                carry_forward(channels, ChannelKey::Network);
            }
        }
    }

    fn sample_gpu(&mut self, channels: &mut ChannelSet, surface: &mut dyn OverlaySurface) {
        if self.gpu == GpuCapability::Unsupported {
            // Static label was set by announce(); series stays flat at zero.
            channels.get_mut(ChannelKey::Gpu).append(0.0);
            return;
        }
        match self.provider.gpu_snapshot() {
            Ok(gpus) if gpus.is_empty() => {
                surface.set_label(LabelKey::GpuInfo, "No GPU detected");
                channels.get_mut(ChannelKey::Gpu).append(0.0);
            }
            Ok(gpus) => {
                let lines: Vec<String> = gpus
                    .iter()
                    .map(|g| {
                        let mut line = format!(
                            "{}  load: {:.0}%  mem: {}/{} MB",
                            g.name, g.load_percent, g.memory_used_mb, g.memory_total_mb
                        );
                        if let Some(t) = g.temperature_c {
                            line.push_str(&format!("  {:.0}\u{00b0}C", t));
                        }
                        line
                    })
                    .collect();
                surface.set_label(LabelKey::GpuInfo, &lines.join("\n"));
                channels.get_mut(ChannelKey::Gpu).append(gpus[0].load_percent);
                self.latest.gpus = gpus;
            }
            Err(e) => {
                debug!("gpu snapshot failed: {}", e);
                carry_forward(channels, ChannelKey::Gpu);
            }
        }
    }

    fn sample_system(&mut self, channels: &mut ChannelSet, surface: &mut dyn OverlaySurface) {
        let host = self.provider.host_info();
        surface.set_label(
            LabelKey::SysOs,
            &format!("OS: {} {}", host.os_name, host.os_release),
        );
        surface.set_label(LabelKey::SysHost, &format!("Host: {}", host.hostname));

        match self.provider.boot_time() {
            Ok(boot) => {
                self.latest.boot_epoch = Some(boot);
                let now_epoch = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(boot);
                let uptime = now_epoch.saturating_sub(boot);
                surface.set_label(LabelKey::SysUptime, &format!("Uptime: {}", fmt_uptime(uptime)));
                channels
                    .get_mut(ChannelKey::System)
                    .append(uptime as f64 / 3600.0);
            }
            Err(e) => {
                debug!("boot time failed: {}", e);
                carry_forward(channels, ChannelKey::System);
            }
        }
    }

    /// Detail row shown under the active panel in expanded mode.
    fn detail_text(&self, key: ChannelKey) -> String {
        match key {
            ChannelKey::Cpu => {
                let cores = self.provider.cpu_core_counts();
                let freq = self
                    .latest
                    .cpu_freq_mhz
                    .map(|f| format!("{:.0} MHz", f))
                    .unwrap_or_else(|| "N/A".to_string());
                let procs = self
                    .latest
                    .process_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                format!(
                    "Cores: {}   Threads: {}   Processes: {}\nFreq: {}",
                    cores.physical, cores.logical, procs, freq
                )
            }
            ChannelKey::Memory => match &self.latest.memory {
                Some(m) => format!(
                    "Total: {:.2} GB  Used: {:.2} GB  Free: {:.2} GB",
                    m.total_bytes as f64 / GIB,
                    m.used_bytes as f64 / GIB,
                    m.available_bytes as f64 / GIB
                ),
                None => "N/A".to_string(),
            },
            ChannelKey::Disk => match &self.latest.disk {
                Some(d) => format!(
                    "Total: {:.2} GB  Used: {:.2} GB  Free: {:.2} GB",
                    d.total_bytes as f64 / GIB,
                    d.used_bytes as f64 / GIB,
                    d.free_bytes as f64 / GIB
                ),
                None => "N/A".to_string(),
            },
            ChannelKey::Network => match self.latest.net_total_mb {
                Some((sent, recv)) => {
                    format!("Total sent: {:.2} MB   Total received: {:.2} MB", sent, recv)
                }
                None => "N/A".to_string(),
            },
            ChannelKey::Gpu => match self.latest.gpus.first() {
                Some(g) => {
                    let mut text = format!(
                        "{}  Load: {:.0}%  Mem: {}/{} MB",
                        g.name, g.load_percent, g.memory_used_mb, g.memory_total_mb
                    );
                    if let Some(t) = g.temperature_c {
                        text.push_str(&format!("  Temp: {:.0}\u{00b0}C", t));
                    }
                    text
                }
                None => match self.gpu {
                    GpuCapability::Supported => "No GPU detected".to_string(),
                    GpuCapability::Unsupported => "GPU backend not available".to_string(),
                },
            },
            ChannelKey::System => {
                let host = self.provider.host_info();
                let booted = self
                    .latest
                    .boot_epoch
                    .and_then(|b| Local.timestamp_opt(b as i64, 0).single())
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                let procs = self
                    .latest
                    .process_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                format!(
                    "{} {}  Host: {}\nBooted: {}   Processes: {}",
                    host.os_name, host.os_release, host.hostname, booted, procs
                )
            }
        }
    }
}

/// Rate in MB/s for one cumulative counter; the first reading primes the
/// counter and reports zero.
fn advance(slot: &mut Option<RateCounter>, value: u64, now: Instant) -> f64 {
    match slot {
        Some(rc) => rc.advance_mb(value, now),
        None => {
            *slot = Some(RateCounter::new(value, now));
            0.0
        }
    }
}

/// Carry the last sample forward so the sparkline stays continuous when a
/// reading fails mid-run.
fn carry_forward(channels: &mut ChannelSet, key: ChannelKey) {
    if let Some(last) = channels.get(key).last() {
        channels.get_mut(key).append(last);
    }
}

/// `Nd Nh Nm` like the dashboard has always shown it.
fn fmt_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}
