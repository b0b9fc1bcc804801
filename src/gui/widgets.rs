//! Custom widgets for the overlay window.

use eframe::egui;
use egui::epaint::PathShape;
use egui::{Color32, Pos2, Response, Sense, Stroke, Ui, Vec2, Widget};

use super::theme::Palette;

/// Line chart over a rolling history, painted directly.
///
/// Percent-style series get a fixed 0-100 scale so the chart does not
/// rescale on every sample; rate series autoscale to their current maximum.
pub struct Sparkline {
    data: Vec<f32>,
    color: Color32,
    height: f32,
    fixed_max: Option<f32>,
    unit: &'static str,
}

impl Sparkline {
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data,
            color: Palette::ACCENT,
            height: 70.0,
            fixed_max: None,
            unit: "",
        }
    }

    pub fn color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Fix the top of the scale instead of tracking the data maximum.
    pub fn max_value(mut self, max: f32) -> Self {
        self.fixed_max = Some(max);
        self
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }
}

impl Widget for Sparkline {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();

            painter.rect_filled(rect, 4.0, Palette::SURFACE);

            let data_max = self.data.iter().cloned().fold(0.0_f32, f32::max);
            let max_val = self.fixed_max.unwrap_or_else(|| data_max.max(1.0));

            // Quarter gridlines.
            let grid = Stroke::new(0.5, Palette::BORDER.linear_multiply(0.5));
            for i in 1..4 {
                let y = rect.min.y + rect.height() * (i as f32 / 4.0);
                painter.hline(rect.x_range(), y, grid);
            }

            if self.data.len() >= 2 {
                let plot = rect.shrink(4.0);
                let points: Vec<Pos2> = self
                    .data
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        let x = plot.min.x
                            + (i as f32 / (self.data.len() - 1) as f32) * plot.width();
                        let normalized = (v / max_val).clamp(0.0, 1.0);
                        Pos2::new(x, plot.max.y - normalized * plot.height())
                    })
                    .collect();

                // Soft fill under the line.
                let mut fill = points.clone();
                fill.push(Pos2::new(plot.max.x, plot.max.y));
                fill.push(Pos2::new(plot.min.x, plot.max.y));
                painter.add(egui::Shape::convex_polygon(
                    fill,
                    Color32::from_rgba_unmultiplied(
                        self.color.r(),
                        self.color.g(),
                        self.color.b(),
                        18,
                    ),
                    Stroke::NONE,
                ));

                painter.add(PathShape::line(points, Stroke::new(2.0, self.color)));
            }

            if let Some(&current) = self.data.last() {
                painter.text(
                    Pos2::new(rect.max.x - 6.0, rect.min.y + 4.0),
                    egui::Align2::RIGHT_TOP,
                    format!("{:.1} {}", current, self.unit),
                    egui::FontId::proportional(12.0),
                    self.color,
                );
            }

            painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Palette::BORDER));
        }

        response
    }
}

/// Left-aligned heading with a rule out to the right edge.
pub struct PanelHeader<'a> {
    title: &'a str,
}

impl<'a> PanelHeader<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }
}

impl Widget for PanelHeader<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let desired_size = Vec2::new(ui.available_width(), 20.0);
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.text(
                Pos2::new(rect.min.x, rect.center().y),
                egui::Align2::LEFT_CENTER,
                self.title,
                egui::FontId::proportional(13.0),
                Palette::ACCENT,
            );
            let text_width = painter
                .layout_no_wrap(
                    self.title.to_string(),
                    egui::FontId::proportional(13.0),
                    Palette::ACCENT,
                )
                .rect
                .width();
            painter.hline(
                (rect.min.x + text_width + 10.0)..=rect.max.x,
                rect.center().y,
                Stroke::new(1.0, Palette::BORDER),
            );
        }

        response
    }
}
