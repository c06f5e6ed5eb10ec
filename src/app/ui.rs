use super::style::{
    LauncherTheme, BACK_BUTTON_HEIGHT, CELL_HEIGHT, CONTENT_PADDING, ICON_SIDE, LABEL_FONT_SIZE,
    PANEL_ROUNDING, REVEAL_BAND_STEP,
};
use super::LauncherApp;
use crate::branding::{APP_DISPLAY_NAME, TRIGGER_LABEL};
use crate::reveal::{displayed_height, ClipPolygon};
use eframe::egui::{self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};
use log::info;
use std::time::Instant;

const FULL_UV: Rect = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiAction {
    Toggle,
    Launch(usize),
}

impl eframe::App for LauncherApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(result) = self.icon_rx.try_recv() {
            self.attach_icon(ctx, result);
        }
        self.sync_screen(ctx);
        if self.handle_global_input(ctx) {
            return;
        }

        self.panel.advance(Instant::now());
        if self.reload.take_when_settled(self.panel.is_animating()) {
            self.reload_shortcuts();
        }
        self.sync_window(ctx);

        let actions = self.draw(ctx);
        for action in actions {
            match action {
                UiAction::Toggle => self.toggle_panel(),
                UiAction::Launch(index) => {
                    self.grid.activate(index);
                }
            }
        }

        if self.panel.is_animating() {
            ctx.request_repaint();
        }
    }
}

impl LauncherApp {
    fn sync_screen(&mut self, ctx: &egui::Context) {
        let Some(size) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let screen = Rect::from_min_size(Pos2::ZERO, size);
        if screen != self.screen {
            self.screen = screen;
            self.panel.relayout(screen);
        }
    }

    /// Returns `true` when the widget is closing.
    fn handle_global_input(&mut self, ctx: &egui::Context) -> bool {
        let (escape, reload, right_click) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F5),
                i.pointer.button_clicked(egui::PointerButton::Secondary),
            )
        });
        if escape || right_click {
            info!("closing {APP_DISPLAY_NAME}");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return true;
        }
        if reload {
            self.reload.request();
        }
        false
    }

    fn sync_window(&mut self, ctx: &egui::Context) {
        let rect = self
            .panel
            .geometry()
            .window_rect(self.panel.surfaces().panel_visible);
        if self.window.needs_update(rect) {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(rect.min));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(rect.size()));
        }
    }

    fn draw(&self, ctx: &egui::Context) -> Vec<UiAction> {
        let theme = LauncherTheme::default();
        let surfaces = self.panel.surfaces();
        let geometry = self.panel.geometry();
        // Everything is drawn in window-local coordinates.
        let offset = geometry.window_rect(surfaces.panel_visible).min.to_vec2();
        let mut actions = Vec::new();

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if surfaces.panel_visible {
                    let panel_rect = geometry.panel.translate(-offset);
                    self.draw_panel(ui, panel_rect, &theme, &mut actions);
                    if surfaces.back_visible {
                        self.draw_back_button(ui, panel_rect, &theme, &mut actions);
                    }
                }
                if surfaces.trigger_visible {
                    let trigger_rect = geometry.trigger.translate(-offset);
                    let settled = !self.panel.visibility().is_transitioning();
                    draw_trigger(
                        ui,
                        trigger_rect,
                        surfaces.trigger_opacity,
                        settled,
                        &theme,
                        &mut actions,
                    );
                }
            });

        actions
    }

    fn draw_panel(
        &self,
        ui: &egui::Ui,
        panel_rect: Rect,
        theme: &LauncherTheme,
        actions: &mut Vec<UiAction>,
    ) {
        let trigger_height = self.config.trigger_height;
        let body_height =
            displayed_height(self.panel.progress(), trigger_height, panel_rect.height());
        let body = Rect::from_min_size(panel_rect.min, vec2(panel_rect.width(), body_height));

        let painter = ui.painter();
        painter.rect_filled(body.expand(4.0), PANEL_ROUNDING + 4.0, theme.panel_shadow);
        painter.rect_filled(body, PANEL_ROUNDING, theme.panel_bg);
        painter.rect_stroke(body, PANEL_ROUNDING, Stroke::new(1.0, theme.panel_border));
        painter.text(
            pos2(body.min.x + CONTENT_PADDING + 4.0, body.min.y + trigger_height * 0.5),
            Align2::LEFT_CENTER,
            APP_DISPLAY_NAME,
            FontId::proportional(15.0),
            theme.label_color,
        );

        let area = icon_area_rect(panel_rect, trigger_height);
        let mask = self
            .panel
            .icon_area_mask(area.width() as i32, area.height() as i32);
        if let Some(polygon) = mask.polygon() {
            self.draw_icon_area(ui, area, polygon, theme, actions);
        }
    }

    fn draw_icon_area(
        &self,
        ui: &egui::Ui,
        area: Rect,
        polygon: &ClipPolygon,
        theme: &LauncherTheme,
        actions: &mut Vec<UiAction>,
    ) {
        if polygon.is_empty() {
            return;
        }
        let visible = |pos: Pos2| polygon.contains(pos.x - area.min.x, pos.y - area.min.y);
        let bands = polygon.bands(REVEAL_BAND_STEP);

        if self.grid.is_empty() {
            for band in &bands {
                let painter = ui.painter().with_clip_rect(band_rect(area, band));
                paint_empty_hint(&painter, area, theme);
            }
            return;
        }

        let cell_width = area.width() / self.grid.columns() as f32;
        let cell_rect = |row: usize, col: usize| {
            Rect::from_min_size(
                area.min + vec2(col as f32 * cell_width, row as f32 * CELL_HEIGHT),
                vec2(cell_width, CELL_HEIGHT),
            )
        };

        let mut hovered = None;
        for (index, cell) in self.grid.cells().iter().enumerate() {
            let rect = cell_rect(cell.row, cell.col).intersect(area);
            if !rect.is_positive() {
                continue;
            }
            let response = ui.interact(rect, ui.id().with(("cell", index)), Sense::click());
            if response.hover_pos().is_some_and(visible) {
                hovered = Some(index);
            }
            if response.clicked() && response.interact_pointer_pos().is_some_and(visible) {
                actions.push(UiAction::Launch(index));
            }
        }

        let max_chars = label_capacity(cell_width);
        for band in &bands {
            let clip = band_rect(area, band);
            let painter = ui.painter().with_clip_rect(clip);
            for (index, cell) in self.grid.cells().iter().enumerate() {
                let rect = cell_rect(cell.row, cell.col);
                if !rect.intersects(clip) {
                    continue;
                }
                let texture = cell.icon.as_ref().unwrap_or(&self.placeholder);
                paint_cell(
                    &painter,
                    rect,
                    texture.id(),
                    &truncate_label(&cell.entry.name, max_chars),
                    hovered == Some(index),
                    theme,
                );
            }
        }
    }

    fn draw_back_button(
        &self,
        ui: &egui::Ui,
        panel_rect: Rect,
        theme: &LauncherTheme,
        actions: &mut Vec<UiAction>,
    ) {
        let rect = Rect::from_min_size(
            pos2(
                panel_rect.min.x + CONTENT_PADDING,
                panel_rect.max.y - BACK_BUTTON_HEIGHT - CONTENT_PADDING * 0.5,
            ),
            vec2(panel_rect.width() - CONTENT_PADDING * 2.0, BACK_BUTTON_HEIGHT),
        );
        let response = ui.interact(rect, ui.id().with("back"), Sense::click());
        let fill = if response.hovered() {
            theme.back_hover
        } else {
            theme.back_bg
        };
        let painter = ui.painter();
        painter.rect_filled(rect, BACK_BUTTON_HEIGHT * 0.5, fill);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "Close",
            FontId::proportional(14.0),
            theme.back_text,
        );
        if response.clicked() {
            actions.push(UiAction::Toggle);
        }
    }
}

fn draw_trigger(
    ui: &egui::Ui,
    rect: Rect,
    opacity: f32,
    settled: bool,
    theme: &LauncherTheme,
    actions: &mut Vec<UiAction>,
) {
    let response = ui.interact(rect, ui.id().with("trigger"), Sense::click());
    let painter = ui.painter();
    let rounding = rect.height() * 0.5;
    let border_width = if settled && response.hovered() { 2.0 } else { 1.0 };

    painter.rect_filled(rect.shrink(1.0), rounding, theme.trigger_bg.gamma_multiply(opacity));
    painter.rect_stroke(
        rect.shrink(1.0),
        rounding,
        Stroke::new(border_width, theme.trigger_border.gamma_multiply(opacity)),
    );

    let text_color = theme.trigger_text.gamma_multiply(opacity);
    painter.text(
        rect.center() - vec2(8.0, 0.0),
        Align2::CENTER_CENTER,
        TRIGGER_LABEL,
        FontId::proportional(17.0),
        text_color,
    );
    let tip = pos2(rect.center().x + 28.0, rect.center().y + 4.0);
    painter.add(egui::Shape::convex_polygon(
        vec![tip, tip + vec2(6.0, -8.0), tip + vec2(-6.0, -8.0)],
        text_color,
        Stroke::NONE,
    ));

    if response.clicked() {
        actions.push(UiAction::Toggle);
    }
}

fn icon_area_rect(panel_rect: Rect, trigger_height: f32) -> Rect {
    Rect::from_min_max(
        pos2(
            panel_rect.min.x + CONTENT_PADDING,
            panel_rect.min.y + trigger_height,
        ),
        pos2(
            panel_rect.max.x - CONTENT_PADDING,
            panel_rect.max.y - BACK_BUTTON_HEIGHT - CONTENT_PADDING,
        ),
    )
}

fn band_rect(area: Rect, band: &crate::reveal::ClipBand) -> Rect {
    Rect::from_min_max(
        area.min + vec2(0.0, band.top),
        area.min + vec2(band.right, band.bottom),
    )
}

fn paint_cell(
    painter: &egui::Painter,
    rect: Rect,
    texture: egui::TextureId,
    label: &str,
    hovered: bool,
    theme: &LauncherTheme,
) {
    if hovered {
        painter.rect_filled(rect.shrink(3.0), 10.0, theme.cell_hover);
    }
    let icon_rect = Rect::from_center_size(
        pos2(rect.center().x, rect.min.y + 8.0 + ICON_SIDE * 0.5),
        vec2(ICON_SIDE, ICON_SIDE),
    );
    painter.image(texture, icon_rect, FULL_UV, Color32::WHITE);
    painter.text(
        pos2(rect.center().x, icon_rect.max.y + 6.0),
        Align2::CENTER_TOP,
        label,
        FontId::proportional(LABEL_FONT_SIZE),
        theme.label_color,
    );
}

fn paint_empty_hint(painter: &egui::Painter, area: Rect, theme: &LauncherTheme) {
    let center = pos2(area.center().x, area.min.y + 48.0);
    painter.text(
        center,
        Align2::CENTER_CENTER,
        "No shortcuts yet",
        FontId::proportional(15.0),
        theme.label_color,
    );
    painter.text(
        center + vec2(0.0, 22.0),
        Align2::CENTER_CENTER,
        "Edit data/apps.json, then press F5",
        FontId::proportional(12.0),
        theme.hint_color,
    );
}

// Rough glyph budget for a label under an icon.
fn label_capacity(cell_width: f32) -> usize {
    ((cell_width - 8.0) / (LABEL_FONT_SIZE * 0.55)).max(3.0) as usize
}

fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let kept: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
