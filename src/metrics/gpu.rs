//! Capability-checked GPU backend.
//!
//! NVML is probed exactly once at startup. Without the `nvidia` feature, or
//! when initialization fails (no driver, no device), the backend reports
//! `Unsupported` and the GPU channel degrades to a constant zero with a
//! static placeholder label. No per-tick error handling is needed.

#[cfg(feature = "nvidia")]
use log::{debug, info};

use crate::error::Result;

use super::{GpuCapability, GpuDevice};

#[cfg(feature = "nvidia")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};

/// GPU metrics source. Holds the NVML handle for the process lifetime.
pub struct GpuBackend {
    #[cfg(feature = "nvidia")]
    nvml: Option<Nvml>,
}

impl GpuBackend {
    /// Probe the backend. Failure to initialize is a capability result,
    /// not an error.
    pub fn init() -> Self {
        #[cfg(feature = "nvidia")]
        {
            let nvml = match Nvml::init() {
                Ok(nvml) => {
                    info!("NVML initialized, GPU channel enabled");
                    Some(nvml)
                }
                Err(e) => {
                    debug!("NVML unavailable, GPU channel disabled: {}", e);
                    None
                }
            };
            Self { nvml }
        }
        #[cfg(not(feature = "nvidia"))]
        {
            Self {}
        }
    }

    pub fn capability(&self) -> GpuCapability {
        #[cfg(feature = "nvidia")]
        {
            if self.nvml.is_some() {
                return GpuCapability::Supported;
            }
        }
        GpuCapability::Unsupported
    }

    /// Readings for every device. Empty when the backend is unsupported.
    pub fn snapshot(&self) -> Result<Vec<GpuDevice>> {
        #[cfg(feature = "nvidia")]
        {
            if let Some(nvml) = &self.nvml {
                let count = nvml.device_count()?;
                let mut devices = Vec::with_capacity(count as usize);
                for i in 0..count {
                    let device = nvml.device_by_index(i)?;
                    let memory = device.memory_info()?;
                    devices.push(GpuDevice {
                        name: device.name()?,
                        load_percent: f64::from(device.utilization_rates()?.gpu),
                        memory_used_mb: memory.used / (1024 * 1024),
                        memory_total_mb: memory.total / (1024 * 1024),
                        temperature_c: device
                            .temperature(TemperatureSensor::Gpu)
                            .ok()
                            .map(f64::from),
                    });
                }
                return Ok(devices);
            }
        }
        Ok(Vec::new())
    }
}
