//! Application state and per-frame logic for the overlay window.
//!
//! The app owns the timer queue, the sampling engine and the overlay
//! controller. Each egui frame: translate pointer hover transitions into
//! enter/leave notifications, drain due timer events, apply any pushed
//! geometry as viewport commands, then draw the dashboard from the pushed
//! labels and series.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{RichText, ViewportCommand};
use log::info;

use super::theme::{self, Palette};
use super::widgets::{PanelHeader, Sparkline};
use crate::channel::{self, ChannelKey, ChannelSet, PanelMode};
use crate::config::Config;
use crate::metrics::PlatformProvider;
use crate::overlay::{OverlayController, OverlayEvent};
use crate::sampler::SamplingEngine;
use crate::surface::{LabelKey, OverlaySurface};
use crate::timer::TimerQueue;

/// Used when the backend cannot report a monitor size.
const FALLBACK_SCREEN_WIDTH: f64 = 1920.0;

/// Surface backed by plain frame state. The core pushes geometry, series
/// snapshots and label text here; `update` turns them into viewport commands
/// and widgets.
#[derive(Default)]
struct FrameState {
    pending_geometry: Option<(f64, f64, f64, f64)>,
    series: HashMap<ChannelKey, Vec<f64>>,
    labels: HashMap<LabelKey, String>,
}

impl FrameState {
    fn label(&self, key: LabelKey) -> &str {
        self.labels.get(&key).map(String::as_str).unwrap_or("")
    }

    fn points(&self, key: ChannelKey) -> Vec<f32> {
        self.series
            .get(&key)
            .map(|s| s.iter().map(|&v| v as f32).collect())
            .unwrap_or_default()
    }
}

impl OverlaySurface for FrameState {
    fn set_geometry(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.pending_geometry = Some((x, y, width, height));
    }

    fn render_channel(&mut self, key: ChannelKey, series: &[f64]) {
        self.series.insert(key, series.to_vec());
    }

    fn set_label(&mut self, key: LabelKey, text: &str) {
        self.labels.insert(key, text.to_string());
    }
}

/// Label rows shown under a panel's chart.
fn label_rows(key: ChannelKey) -> &'static [LabelKey] {
    match key {
        ChannelKey::Cpu => &[LabelKey::CpuUsage, LabelKey::CpuFreq, LabelKey::CpuCores],
        ChannelKey::Memory => &[LabelKey::MemUsage, LabelKey::MemDetail],
        ChannelKey::Disk => &[LabelKey::DiskUsage, LabelKey::DiskRw, LabelKey::DiskFree],
        ChannelKey::Network => &[LabelKey::NetSpeed, LabelKey::NetTotal],
        ChannelKey::Gpu => &[LabelKey::GpuInfo],
        ChannelKey::System => &[LabelKey::SysOs, LabelKey::SysHost, LabelKey::SysUptime],
    }
}

/// Percent series get a fixed scale; rates autoscale.
fn fixed_max(key: ChannelKey) -> Option<f32> {
    if channel::spec(key).unit == "%" {
        Some(100.0)
    } else {
        None
    }
}

pub struct OverlayApp {
    config: Config,
    controller: Option<OverlayController>,
    engine: SamplingEngine<PlatformProvider>,
    channels: ChannelSet,
    timers: TimerQueue<OverlayEvent>,
    frame: FrameState,
    interval: Duration,
    hovering: bool,
}

impl OverlayApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        theme::apply(&cc.egui_ctx);
        let engine = SamplingEngine::new(PlatformProvider::new(), &config.sampling);
        let interval = Duration::from_millis(config.sampling.interval_ms);
        Self {
            config,
            controller: None,
            engine,
            channels: ChannelSet::new(),
            timers: TimerQueue::new(),
            frame: FrameState::default(),
            interval,
            hovering: false,
        }
    }

    /// First frame: the monitor size is only known once the window exists.
    fn init(&mut self, ctx: &egui::Context, now: Instant) {
        let screen_width = ctx
            .input(|i| i.viewport().monitor_size)
            .map(|s| f64::from(s.x))
            .unwrap_or(FALLBACK_SCREEN_WIDTH);
        info!("docking to screen width {}", screen_width);

        let controller = OverlayController::new(&self.config, screen_width);
        controller.apply_geometry(&mut self.frame);
        self.engine.announce(&mut self.frame);
        self.timers
            .schedule(now, Duration::ZERO, OverlayEvent::SampleTick);
        self.controller = Some(controller);
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(ViewportCommand::Close);
            return;
        }

        if self.controller.is_none() {
            self.init(ctx, now);
        }
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        // Pointer position in window and screen coordinates.
        let hover_pos = ctx.input(|i| i.pointer.hover_pos());
        let outer = ctx.input(|i| i.viewport().outer_rect);
        let pointer_x = match (hover_pos, outer) {
            (Some(p), Some(r)) => Some(f64::from(r.min.x + p.x)),
            _ => None,
        };

        let hovered = hover_pos.is_some();
        if hovered && !self.hovering {
            controller.pointer_entered(&mut self.timers, now);
        } else if !hovered && self.hovering {
            controller.pointer_left(&mut self.timers, now);
        }
        self.hovering = hovered;

        while let Some(event) = self.timers.pop_due(now) {
            match event {
                OverlayEvent::SampleTick => {
                    self.engine.tick(
                        now,
                        &mut self.channels,
                        controller.state.panel_mode,
                        controller.state.active_panel,
                        &mut self.frame,
                    );
                    self.timers
                        .schedule(now, self.interval, OverlayEvent::SampleTick);
                }
                other => {
                    controller.handle_event(other, &mut self.timers, now, pointer_x, &mut self.frame)
                }
            }
        }

        if let Some((x, y, w, h)) = self.frame.pending_geometry.take() {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(egui::pos2(
                x as f32, y as f32,
            )));
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(egui::vec2(w as f32, h as f32)));
        }

        let panel_frame = egui::Frame::default()
            .fill(Palette::BACKGROUND)
            .inner_margin(8.0);
        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for key in ChannelKey::ALL {
                        let selected = controller.state.active_panel == key;
                        if ui
                            .selectable_label(selected, channel::spec(key).title)
                            .clicked()
                        {
                            controller.select_panel(key, &self.channels, &mut self.frame);
                        }
                    }
                });
                ui.horizontal(|ui| {
                    let mode_text = match controller.state.panel_mode {
                        PanelMode::Compact => "Expand",
                        PanelMode::Expanded => "Collapse",
                    };
                    if ui.button(mode_text).clicked() {
                        controller.toggle_mode(&mut self.channels, &mut self.frame);
                    }
                    let pin_text = if controller.state.pinned { "Pinned" } else { "Pin" };
                    if ui.selectable_label(controller.state.pinned, pin_text).clicked() {
                        controller.toggle_pin(&mut self.frame);
                    }
                });
                ui.add_space(4.0);

                let active = controller.state.active_panel;
                match controller.state.panel_mode {
                    PanelMode::Compact => {
                        let mut chart = Sparkline::new(self.frame.points(active))
                            .color(theme::channel_color(active))
                            .height(110.0)
                            .unit(channel::spec(active).unit);
                        if let Some(max) = fixed_max(active) {
                            chart = chart.max_value(max);
                        }
                        ui.add(chart);
                        ui.add_space(4.0);
                        for &label in label_rows(active) {
                            let text = self.frame.label(label);
                            if !text.is_empty() {
                                ui.label(RichText::new(text).size(12.0));
                            }
                        }
                    }
                    PanelMode::Expanded => {
                        egui::Grid::new("expanded_charts")
                            .num_columns(2)
                            .spacing([8.0, 8.0])
                            .show(ui, |ui| {
                                for (i, key) in ChannelKey::ALL.into_iter().enumerate() {
                                    let spec = channel::spec(key);
                                    ui.vertical(|ui| {
                                        ui.set_width(ui.available_width().min(390.0));
                                        ui.add(PanelHeader::new(spec.title));
                                        let mut chart = Sparkline::new(self.frame.points(key))
                                            .color(theme::channel_color(key))
                                            .height(80.0)
                                            .unit(spec.unit);
                                        if let Some(max) = fixed_max(key) {
                                            chart = chart.max_value(max);
                                        }
                                        ui.add(chart);
                                    });
                                    if i % 2 == 1 {
                                        ui.end_row();
                                    }
                                }
                            });
                        ui.add_space(4.0);
                        let detail = self.frame.label(LabelKey::Detail(active));
                        if !detail.is_empty() {
                            ui.label(
                                RichText::new(detail)
                                    .size(12.0)
                                    .color(Palette::TEXT_MUTED),
                            );
                        }
                    }
                }
            });

        let wait = self
            .timers
            .next_deadline()
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(self.interval);
        ctx.request_repaint_after(wait);
    }
}
