use eframe::egui;

/// Ask the icon worker to decode one icon reference.
#[derive(Debug, Clone)]
pub struct IconRequest {
    pub icon_ref: String,
    pub size: u32,
}

#[derive(Debug)]
pub struct IconResult {
    pub icon_ref: String,
    /// `None` when the reference could not be resolved.
    pub image: Option<egui::ColorImage>,
}
