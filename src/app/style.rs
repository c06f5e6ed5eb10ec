use eframe::egui::Color32;

pub const CONTENT_PADDING: f32 = 12.0;
pub const CELL_HEIGHT: f32 = 78.0;
pub const ICON_SIDE: f32 = 40.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const BACK_BUTTON_HEIGHT: f32 = 32.0;
pub const PANEL_ROUNDING: f32 = 16.0;
/// Height of one clip band in the skewed part of the reveal.
pub const REVEAL_BAND_STEP: f32 = 3.0;

#[derive(Clone, Copy)]
pub struct LauncherTheme {
    pub trigger_bg: Color32,
    pub trigger_border: Color32,
    pub trigger_text: Color32,
    pub panel_bg: Color32,
    pub panel_border: Color32,
    pub panel_shadow: Color32,
    pub cell_hover: Color32,
    pub label_color: Color32,
    pub hint_color: Color32,
    pub back_bg: Color32,
    pub back_hover: Color32,
    pub back_text: Color32,
}

impl Default for LauncherTheme {
    fn default() -> Self {
        Self {
            trigger_bg: Color32::from_rgba_premultiplied(21, 32, 48, 220),
            trigger_border: Color32::from_rgba_premultiplied(93, 214, 189, 150),
            trigger_text: Color32::from_rgb(242, 248, 255),
            panel_bg: Color32::from_rgba_premultiplied(14, 20, 31, 214),
            panel_border: Color32::from_rgba_premultiplied(161, 179, 201, 36),
            panel_shadow: Color32::from_rgba_premultiplied(3, 8, 16, 75),
            cell_hover: Color32::from_rgba_premultiplied(35, 53, 74, 184),
            label_color: Color32::from_rgb(228, 236, 246),
            hint_color: Color32::from_rgba_premultiplied(205, 221, 238, 150),
            back_bg: Color32::from_rgba_premultiplied(45, 104, 114, 192),
            back_hover: Color32::from_rgba_premultiplied(60, 140, 150, 220),
            back_text: Color32::from_rgb(245, 250, 255),
        }
    }
}
