//! Edge-docked system telemetry overlay.
//!
//! The crate is split into a platform/interaction core and an optional GUI:
//!
//! - [`metrics`]: platform providers for CPU, memory, disk, network, GPU and
//!   host information
//! - [`sampler`]: turns cumulative counters into per-second rates and feeds
//!   rolling histories once per tick
//! - [`channel`]: bounded per-metric histories with compact/expanded
//!   capacities
//! - [`overlay`]: the reveal/retract state machine (hover debounce, slide
//!   animation, layout modes, pinning)
//! - [`timer`]: the deterministic single-queue timer model everything above
//!   runs on
//! - [`surface`]: the narrow trait the core renders through
//! - [`gui`] (feature `gui`): the eframe window implementing that trait
//!
//! The core never talks to a windowing system, so the whole interaction
//! model is exercised by tests against a recording surface and a virtual
//! clock.

pub mod channel;
pub mod config;
pub mod error;
pub mod metrics;
pub mod overlay;
pub mod rate;
pub mod sampler;
pub mod surface;
pub mod timer;

#[cfg(feature = "gui")]
pub mod gui;

pub use channel::{ChannelKey, ChannelSet, MetricChannel, PanelMode};
pub use config::Config;
pub use error::{EmonError, Result};
pub use metrics::{MetricsProvider, PlatformProvider};
pub use overlay::{OverlayController, OverlayEvent, SlideState, WindowState};
pub use sampler::SamplingEngine;
pub use surface::{LabelKey, OverlaySurface};
pub use timer::{TimerHandle, TimerQueue};
