use anyhow::Result;
use eframe::egui;
use lineclip_core::clip::Segment;
use lineclip_core::fit::{fit_viewport, FitConfig};
use lineclip_core::geom::{BBox2, Vec2 as WorldVec2};
use lineclip_core::model::PointSet;
use lineclip_core::observer::ViewportObserver;
use lineclip_core::viewport::Viewport;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let input = std::env::args_os().nth(1).map(PathBuf::from);
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "lineclip",
        native_options,
        Box::new(move |cc| Ok(Box::new(LineClipApp::new(cc, input)))),
    )
}

struct LineClipApp {
    input_path: Option<PathBuf>,
    points: Option<PointSet>,
    viewport: Option<Viewport>,
    /// Written by the viewport observer, read when painting.
    line_layer: Rc<RefCell<Option<Segment>>>,
    status: String,
}

impl LineClipApp {
    fn new(_cc: &eframe::CreationContext<'_>, input: Option<PathBuf>) -> Self {
        let mut app = Self {
            input_path: None,
            points: None,
            viewport: None,
            line_layer: Rc::default(),
            status: "Drop a point file here, or pass one on the command line.".to_string(),
        };
        if let Some(path) = input {
            app.load_input(&path);
        }
        app
    }

    fn load_input(&mut self, path: &Path) {
        match lineclip_import::import_points(path) {
            Ok(points) => {
                self.line_layer = Rc::default();
                let mut viewport = Viewport::new(fit_viewport(&points, &FitConfig::default()));
                match points.line() {
                    Ok(line) => {
                        let mut observer =
                            ViewportObserver::with_line(line, Rc::clone(&self.line_layer));
                        observer.sync(&viewport);
                        viewport.on_bounds_changed(move |change| {
                            observer.on_viewport_changed(&change.bounds);
                        });
                        self.status = format!("Loaded {}", path.display());
                    }
                    Err(e) => {
                        warn!(path = %path.display(), "no line to draw: {e}");
                        self.status = format!("Loaded {} (no line: {e})", path.display());
                    }
                }
                self.points = Some(points);
                self.viewport = Some(viewport);
                self.input_path = Some(path.to_path_buf());
            }
            Err(e) => {
                self.status = format!("Failed to load {}: {e:#}", path.display());
                self.points = None;
                self.viewport = None;
                self.line_layer = Rc::default();
            }
        }
    }

    fn reset_view(&mut self) -> Result<()> {
        if let (Some(points), Some(viewport)) = (&self.points, &mut self.viewport) {
            viewport.set_bounds(fit_viewport(points, &FitConfig::default()))?;
        }
        Ok(())
    }

    fn handle_file_drop(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().find(|f| f.path.is_some()) else {
            return;
        };
        if let Some(path) = file.path {
            self.load_input(&path);
        }
    }
}

impl eframe::App for LineClipApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_file_drop(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(vp) = &self.viewport {
                    let b = vp.bounds();
                    ui.separator();
                    ui.monospace(format!(
                        "x [{:.4}, {:.4}]  y [{:.4}, {:.4}]",
                        b.x_min(),
                        b.x_max(),
                        b.y_min(),
                        b.y_max()
                    ));
                    if let Some(seg) = *self.line_layer.borrow() {
                        if !seg.within(&b, 1e-9 * b.width().max(b.height()).max(1.0)) {
                            ui.separator();
                            ui.label("line is outside the view");
                        }
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            draw_plot(ui, self);
        });
    }
}

fn draw_plot(ui: &mut egui::Ui, app: &mut LineClipApp) {
    if app.points.is_none() {
        ui.label("No input loaded.");
        return;
    }

    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

    if response.double_clicked() {
        if let Err(e) = app.reset_view() {
            app.status = format!("Reset failed: {e}");
        }
    }

    let Some(viewport) = app.viewport.as_mut() else {
        return;
    };

    let transform = WorldToScreen::new(rect, viewport.bounds());
    if response.dragged() {
        let delta = transform.delta_to_world(response.drag_delta());
        if let Err(e) = viewport.pan(-delta.x, -delta.y) {
            app.status = format!("Pan failed: {e}");
        }
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.0 {
            let factor = f64::from((scroll / 200.0).exp());
            let anchor = response
                .hover_pos()
                .map(|p| transform.to_world(p))
                .unwrap_or_else(|| viewport.bounds().center());
            if let Err(e) = viewport.zoom(factor, anchor) {
                app.status = format!("Zoom failed: {e}");
            }
        }
    }

    // Bounds may have moved above; paint with the current ones.
    let transform = WorldToScreen::new(rect, viewport.bounds());
    let painter = ui.painter_at(rect);
    painter.rect_stroke(
        rect,
        egui::CornerRadius::same(0),
        egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
        egui::StrokeKind::Inside,
    );

    let Some(points) = &app.points else {
        return;
    };
    let inlier = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x31, 0xA3, 0x54));
    let outlier = egui::Stroke::new(1.0, egui::Color32::from_rgb(0xE3, 0x4A, 0x33));
    for p in &points.points {
        let stroke = if p.is_inlier() { inlier } else { outlier };
        draw_plus(&painter, transform.point(p.pos), 4.0, stroke);
    }

    if let Some(seg) = *app.line_layer.borrow() {
        let stroke = egui::Stroke::new(1.5, egui::Color32::from_rgb(0x31, 0x8B, 0xBD));
        painter.line_segment([transform.point(seg.a), transform.point(seg.b)], stroke);
    }
}

fn draw_plus(painter: &egui::Painter, at: egui::Pos2, half: f32, stroke: egui::Stroke) {
    painter.line_segment(
        [at - egui::vec2(half, 0.0), at + egui::vec2(half, 0.0)],
        stroke,
    );
    painter.line_segment(
        [at - egui::vec2(0.0, half), at + egui::vec2(0.0, half)],
        stroke,
    );
}

/// Maps the viewport rectangle onto the screen rect, y up.
#[derive(Debug, Clone, Copy)]
struct WorldToScreen {
    rect: egui::Rect,
    world: BBox2,
}

impl WorldToScreen {
    fn new(rect: egui::Rect, world: BBox2) -> Self {
        Self { rect, world }
    }

    fn scale(&self) -> (f64, f64) {
        let sx = f64::from(self.rect.width().max(1.0)) / self.world.width().max(1e-12);
        let sy = f64::from(self.rect.height().max(1.0)) / self.world.height().max(1e-12);
        (sx, sy)
    }

    fn point(&self, p: WorldVec2) -> egui::Pos2 {
        let (sx, sy) = self.scale();
        let x = f64::from(self.rect.left()) + (p.x - self.world.x_min()) * sx;
        let y = f64::from(self.rect.bottom()) - (p.y - self.world.y_min()) * sy;
        egui::pos2(x as f32, y as f32)
    }

    fn to_world(&self, p: egui::Pos2) -> WorldVec2 {
        let (sx, sy) = self.scale();
        WorldVec2::new(
            self.world.x_min() + f64::from(p.x - self.rect.left()) / sx,
            self.world.y_min() + f64::from(self.rect.bottom() - p.y) / sy,
        )
    }

    fn delta_to_world(&self, d: egui::Vec2) -> WorldVec2 {
        let (sx, sy) = self.scale();
        WorldVec2::new(f64::from(d.x) / sx, -f64::from(d.y) / sy)
    }
}
