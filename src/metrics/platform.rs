//! Platform metrics provider.
//!
//! # Platform Support
//!
//! - **Linux**: reads `/proc/stat`, `/proc/meminfo`, `/proc/diskstats`,
//!   `/proc/net/dev`, `/etc/os-release`, and `statvfs` for disk usage
//! - **Other platforms**: readings degrade to transient failures; the
//!   dashboard shows placeholder labels and keeps running

use log::debug;

use crate::error::{EmonError, Result};

use super::{
    CoreCounts, DiskUsage, GpuBackend, GpuCapability, GpuDevice, HostInfo, IoCounters, MemoryInfo,
    MetricsProvider, NetCounters,
};

/// Provider backed by the local OS, plus the capability-checked GPU backend.
pub struct PlatformProvider {
    gpu: GpuBackend,
    #[cfg(target_os = "linux")]
    prev_cpu: Option<linux::CpuTimes>,
}

impl PlatformProvider {
    pub fn new() -> Self {
        Self {
            gpu: GpuBackend::init(),
            #[cfg(target_os = "linux")]
            prev_cpu: None,
        }
    }
}

impl Default for PlatformProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for PlatformProvider {
    fn cpu_percent(&mut self) -> Result<f64> {
        #[cfg(target_os = "linux")]
        {
            let cur = linux::read_cpu_times()?;
            let pct = match self.prev_cpu {
                Some(prev) => prev.percent_to(&cur),
                None => 0.0,
            };
            self.prev_cpu = Some(cur);
            Ok(pct)
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("cpu_percent"))
        }
    }

    fn cpu_frequency_mhz(&mut self) -> Result<Option<f64>> {
        #[cfg(target_os = "linux")]
        {
            Ok(linux::read_cpu_frequency_mhz())
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("cpu_frequency"))
        }
    }

    fn cpu_core_counts(&self) -> CoreCounts {
        CoreCounts {
            physical: num_cpus::get_physical(),
            logical: num_cpus::get(),
        }
    }

    fn memory(&mut self) -> Result<MemoryInfo> {
        #[cfg(target_os = "linux")]
        {
            linux::read_memory()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("memory"))
        }
    }

    fn disk_usage(&mut self, path: &str) -> Result<DiskUsage> {
        #[cfg(unix)]
        {
            unix_disk_usage(path)
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Err(unsupported("disk_usage"))
        }
    }

    fn disk_io_counters(&mut self) -> Result<IoCounters> {
        #[cfg(target_os = "linux")]
        {
            linux::read_disk_io()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("disk_io_counters"))
        }
    }

    fn net_io_counters(&mut self) -> Result<NetCounters> {
        #[cfg(target_os = "linux")]
        {
            linux::read_net_io()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("net_io_counters"))
        }
    }

    fn boot_time(&self) -> Result<u64> {
        #[cfg(target_os = "linux")]
        {
            linux::read_boot_time()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("boot_time"))
        }
    }

    fn process_count(&mut self) -> Result<usize> {
        #[cfg(target_os = "linux")]
        {
            linux::count_processes()
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(unsupported("process_count"))
        }
    }

    fn gpu_capability(&self) -> GpuCapability {
        self.gpu.capability()
    }

    fn gpu_snapshot(&mut self) -> Result<Vec<GpuDevice>> {
        self.gpu.snapshot()
    }

    fn host_info(&self) -> HostInfo {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|e| {
                debug!("hostname lookup failed: {}", e);
                String::from("unknown")
            });
        #[cfg(target_os = "linux")]
        let (os_name, os_release) = linux::read_os_identity();
        #[cfg(not(target_os = "linux"))]
        let (os_name, os_release) = (std::env::consts::OS.to_string(), String::new());
        HostInfo {
            os_name,
            os_release,
            hostname,
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn unsupported(what: &str) -> EmonError {
    EmonError::ProviderTransient(format!("{} not supported on this platform", what))
}

/// `statvfs`-based usage; percent follows psutil (used over used+available,
/// so reserved blocks don't count against the user).
#[cfg(unix)]
fn unix_disk_usage(path: &str) -> Result<DiskUsage> {
    let stat = nix::sys::statvfs::statvfs(path)
        .map_err(|e| EmonError::PathUnavailable(format!("{}: {}", path, e)))?;
    let frsize = stat.fragment_size() as u64;
    let total = stat.blocks() as u64 * frsize;
    let free = stat.blocks_available() as u64 * frsize;
    let used = total.saturating_sub(stat.blocks_free() as u64 * frsize);
    let percent = if used + free > 0 {
        used as f64 / (used + free) as f64 * 100.0
    } else {
        0.0
    };
    Ok(DiskUsage {
        percent,
        used_bytes: used,
        free_bytes: free,
        total_bytes: total,
    })
}

#[cfg(target_os = "linux")]
mod linux {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECTOR_SIZE: u64 = 512;

    /// Aggregate CPU times from the first line of `/proc/stat`.
    #[derive(Debug, Clone, Copy)]
    pub struct CpuTimes {
        pub idle: u64,
        pub total: u64,
    }

    impl CpuTimes {
        /// Utilization percent over the interval from `self` to `cur`.
        pub fn percent_to(&self, cur: &CpuTimes) -> f64 {
            let total = cur.total.saturating_sub(self.total);
            let idle = cur.idle.saturating_sub(self.idle);
            if total == 0 {
                return 0.0;
            }
            (total - idle.min(total)) as f64 / total as f64 * 100.0
        }
    }

    pub fn read_cpu_times() -> Result<CpuTimes> {
        let stat = std::fs::read_to_string("/proc/stat")?;
        let line = stat
            .lines()
            .next()
            .ok_or_else(|| EmonError::Parse("/proc/stat is empty".to_string()))?;
        let fields: Vec<u64> = line
            .split_whitespace()
            .skip(1)
            .filter_map(|v| v.parse().ok())
            .collect();
        if fields.len() < 5 {
            return Err(EmonError::Parse(format!("short cpu line: {}", line)));
        }
        // idle + iowait count as idle time
        let idle = fields[3] + fields[4];
        let total: u64 = fields.iter().sum();
        Ok(CpuTimes { idle, total })
    }

    pub fn read_cpu_frequency_mhz() -> Option<f64> {
        if let Ok(khz) =
            std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq")
        {
            if let Ok(khz) = khz.trim().parse::<f64>() {
                return Some(khz / 1000.0);
            }
        }
        // Older kernels and VMs only report it in cpuinfo
        let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").ok()?;
        for line in cpuinfo.lines() {
            if let Some(rest) = line.strip_prefix("cpu MHz") {
                if let Some(value) = rest.split(':').nth(1) {
                    return value.trim().parse().ok();
                }
            }
        }
        None
    }

    pub fn read_memory() -> Result<MemoryInfo> {
        let meminfo = std::fs::read_to_string("/proc/meminfo")?;
        let mut total_kb = 0u64;
        let mut available_kb = 0u64;
        for line in meminfo.lines() {
            if let Some(rest) = line.strip_prefix("MemTotal:") {
                total_kb = parse_kb(rest);
            } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
                available_kb = parse_kb(rest);
            }
        }
        if total_kb == 0 {
            return Err(EmonError::Parse("MemTotal missing".to_string()));
        }
        let total = total_kb * 1024;
        let available = available_kb * 1024;
        let used = total.saturating_sub(available);
        Ok(MemoryInfo {
            percent: used as f64 / total as f64 * 100.0,
            used_bytes: used,
            total_bytes: total,
            available_bytes: available,
        })
    }

    fn parse_kb(rest: &str) -> u64 {
        rest.split_whitespace()
            .next()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn read_disk_io() -> Result<IoCounters> {
        let diskstats = std::fs::read_to_string("/proc/diskstats")?;
        let mut read_bytes = 0u64;
        let mut write_bytes = 0u64;
        for line in diskstats.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                continue;
            }
            let name = fields[2];
            if !is_physical_disk(name) {
                continue;
            }
            let sectors_read: u64 = fields[5].parse().unwrap_or(0);
            let sectors_written: u64 = fields[9].parse().unwrap_or(0);
            read_bytes += sectors_read * SECTOR_SIZE;
            write_bytes += sectors_written * SECTOR_SIZE;
        }
        Ok(IoCounters {
            read_bytes,
            write_bytes,
        })
    }

    /// Whole devices only; partitions would double-count the same sectors.
    fn is_physical_disk(name: &str) -> bool {
        for skip in ["loop", "ram", "zram", "fd", "sr", "dm-"] {
            if name.starts_with(skip) {
                return false;
            }
        }
        if name.starts_with("nvme") || name.starts_with("mmcblk") {
            // nvme0n1p2 / mmcblk0p1 are partitions of nvme0n1 / mmcblk0
            return match name.rfind('p') {
                Some(i) => name[i + 1..].is_empty() || !name[i + 1..].chars().all(|c| c.is_ascii_digit()),
                None => true,
            };
        }
        // sda1, vdb2, xvda1 are partitions
        !name
            .chars()
            .last()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    }

    pub fn read_net_io() -> Result<NetCounters> {
        let netdev = std::fs::read_to_string("/proc/net/dev")?;
        let mut bytes_recv = 0u64;
        let mut bytes_sent = 0u64;
        for line in netdev.lines().skip(2) {
            let Some((iface, rest)) = line.split_once(':') else {
                continue;
            };
            if iface.trim() == "lo" {
                continue;
            }
            let fields: Vec<&str> = rest.split_whitespace().collect();
            if fields.len() < 9 {
                continue;
            }
            bytes_recv += fields[0].parse::<u64>().unwrap_or(0);
            bytes_sent += fields[8].parse::<u64>().unwrap_or(0);
        }
        Ok(NetCounters {
            bytes_sent,
            bytes_recv,
        })
    }

    pub fn read_boot_time() -> Result<u64> {
        let stat = std::fs::read_to_string("/proc/stat")?;
        for line in stat.lines() {
            if let Some(rest) = line.strip_prefix("btime ") {
                return rest
                    .trim()
                    .parse()
                    .map_err(|_| EmonError::Parse(format!("bad btime: {}", rest)));
            }
        }
        // Fall back to uptime arithmetic when btime is absent
        let uptime = std::fs::read_to_string("/proc/uptime")?;
        let secs: f64 = uptime
            .split_whitespace()
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| EmonError::Parse("bad /proc/uptime".to_string()))?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| EmonError::ProviderTransient(e.to_string()))?
            .as_secs();
        Ok(now.saturating_sub(secs as u64))
    }

    /// Numeric entries under `/proc` are the live PIDs.
    pub fn count_processes() -> Result<usize> {
        let mut count = 0;
        for entry in std::fs::read_dir("/proc")? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn read_os_identity() -> (String, String) {
        let release = std::fs::read_to_string("/proc/sys/kernel/osrelease")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let name = std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|text| {
                text.lines()
                    .find_map(|l| l.strip_prefix("PRETTY_NAME=").map(str::to_string))
            })
            .map(|v| v.trim_matches('"').to_string())
            .unwrap_or_else(|| "Linux".to_string());
        (name, release)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_counts_nonzero() {
        let provider = PlatformProvider::new();
        let cores = provider.cpu_core_counts();
        assert!(cores.logical >= 1);
        assert!(cores.physical >= 1);
        assert!(cores.logical >= cores.physical);
    }

    #[test]
    fn test_host_info_populated() {
        let provider = PlatformProvider::new();
        let host = provider.host_info();
        assert!(!host.hostname.is_empty());
        assert!(!host.os_name.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_disk_usage_root_and_fallback_error() {
        let mut provider = PlatformProvider::new();
        let usage = provider.disk_usage("/").unwrap();
        assert!(usage.total_bytes > 0);
        assert!(usage.percent >= 0.0 && usage.percent <= 100.0);

        let err = provider.disk_usage("/definitely/not/a/mount").unwrap_err();
        assert!(matches!(err, EmonError::PathUnavailable(_)));
    }
}
