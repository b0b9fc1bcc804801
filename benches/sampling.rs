//! Benchmarks for the per-tick sampling path.

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use emonlib::channel::{ChannelKey, ChannelSet, PanelMode};
use emonlib::config::SamplingConfig;
use emonlib::metrics::{
    CoreCounts, DiskUsage, GpuCapability, GpuDevice, HostInfo, IoCounters, MemoryInfo,
    MetricsProvider, NetCounters,
};
use emonlib::rate::RateCounter;
use emonlib::sampler::SamplingEngine;
use emonlib::surface::{LabelKey, OverlaySurface};

/// Provider with canned readings, so the benchmark measures the engine
/// rather than `/proc` parsing.
struct StaticProvider {
    counter: u64,
}

impl MetricsProvider for StaticProvider {
    fn cpu_percent(&mut self) -> emonlib::Result<f64> {
        Ok(37.5)
    }
    fn cpu_frequency_mhz(&mut self) -> emonlib::Result<Option<f64>> {
        Ok(Some(2800.0))
    }
    fn cpu_core_counts(&self) -> CoreCounts {
        CoreCounts {
            physical: 8,
            logical: 16,
        }
    }
    fn memory(&mut self) -> emonlib::Result<MemoryInfo> {
        Ok(MemoryInfo {
            percent: 48.0,
            used_bytes: 8 << 30,
            total_bytes: 16 << 30,
            available_bytes: 8 << 30,
        })
    }
    fn disk_usage(&mut self, _path: &str) -> emonlib::Result<DiskUsage> {
        Ok(DiskUsage {
            percent: 61.0,
            used_bytes: 300 << 30,
            free_bytes: 200 << 30,
            total_bytes: 500 << 30,
        })
    }
    fn disk_io_counters(&mut self) -> emonlib::Result<IoCounters> {
        self.counter += 12 << 20;
        Ok(IoCounters {
            read_bytes: self.counter,
            write_bytes: self.counter / 2,
        })
    }
    fn net_io_counters(&mut self) -> emonlib::Result<NetCounters> {
        Ok(NetCounters {
            bytes_sent: self.counter,
            bytes_recv: self.counter * 3,
        })
    }
    fn boot_time(&self) -> emonlib::Result<u64> {
        Ok(1_700_000_000)
    }
    fn process_count(&mut self) -> emonlib::Result<usize> {
        Ok(200)
    }
    fn gpu_capability(&self) -> GpuCapability {
        GpuCapability::Unsupported
    }
    fn gpu_snapshot(&mut self) -> emonlib::Result<Vec<GpuDevice>> {
        Ok(Vec::new())
    }
    fn host_info(&self) -> HostInfo {
        HostInfo {
            os_name: "Linux".to_string(),
            os_release: "6.1".to_string(),
            hostname: "bench".to_string(),
        }
    }
}

/// Surface that swallows every call.
struct NullSurface;

impl OverlaySurface for NullSurface {
    fn set_geometry(&mut self, _x: f64, _y: f64, _width: f64, _height: f64) {}
    fn render_channel(&mut self, _key: ChannelKey, _series: &[f64]) {}
    fn set_label(&mut self, _key: LabelKey, _text: &str) {}
}

fn bench_channel_append(c: &mut Criterion) {
    c.bench_function("channel_append_at_capacity", |b| {
        let mut channels = ChannelSet::new();
        channels.set_mode(PanelMode::Expanded);
        b.iter(|| {
            for i in 0..120u32 {
                channels.get_mut(ChannelKey::Cpu).append(black_box(f64::from(i)));
            }
        });
    });
}

fn bench_rate_counter(c: &mut Criterion) {
    c.bench_function("rate_counter_advance", |b| {
        let t0 = Instant::now();
        let mut counter = RateCounter::new(0, t0);
        let mut value = 0u64;
        let mut at = t0;
        b.iter(|| {
            value += 4096;
            at += Duration::from_millis(1);
            black_box(counter.advance(value, at));
        });
    });
}

fn bench_engine_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_tick");
    for (name, mode) in [
        ("compact", PanelMode::Compact),
        ("expanded", PanelMode::Expanded),
    ] {
        group.bench_function(name, |b| {
            let mut engine =
                SamplingEngine::new(StaticProvider { counter: 0 }, &SamplingConfig::default());
            let mut channels = ChannelSet::new();
            channels.set_mode(mode);
            let mut surface = NullSurface;
            let t0 = Instant::now();
            let mut tick = 0u64;
            b.iter(|| {
                tick += 1;
                engine.tick(
                    t0 + Duration::from_secs(tick),
                    &mut channels,
                    mode,
                    ChannelKey::Cpu,
                    &mut surface,
                );
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_channel_append,
    bench_rate_counter,
    bench_engine_tick
);
criterion_main!(benches);
