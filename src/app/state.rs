use crate::events::{IconRequest, IconResult};
use crate::grid::ImageProvider;
use crossbeam_channel::Sender;
use eframe::egui;
use log::warn;
use std::collections::HashMap;

enum IconSlot {
    Pending,
    Ready(egui::TextureHandle),
    Missing,
}

/// Texture cache in front of the icon worker.
pub struct IconLoader {
    slots: HashMap<String, IconSlot>,
    req_tx: Sender<IconRequest>,
    side: u32,
}

impl IconLoader {
    pub fn new(req_tx: Sender<IconRequest>, side: u32) -> Self {
        Self {
            slots: HashMap::new(),
            req_tx,
            side,
        }
    }

    /// Uploads a finished decode. Returns the texture when there is one to
    /// attach to the grid.
    pub fn complete(
        &mut self,
        ctx: &egui::Context,
        result: IconResult,
    ) -> Option<(String, egui::TextureHandle)> {
        let Some(image) = result.image else {
            self.slots.insert(result.icon_ref, IconSlot::Missing);
            return None;
        };
        let texture = ctx.load_texture(
            format!("icon:{}", result.icon_ref),
            image,
            egui::TextureOptions::LINEAR,
        );
        self.slots
            .insert(result.icon_ref.clone(), IconSlot::Ready(texture.clone()));
        Some((result.icon_ref, texture))
    }

    /// Forgets every cached icon so the next populate decodes again.
    pub fn invalidate(&mut self) {
        self.slots.clear();
    }
}

impl ImageProvider for IconLoader {
    type Handle = egui::TextureHandle;

    fn request(&mut self, icon_ref: &str) -> Option<egui::TextureHandle> {
        match self.slots.get(icon_ref) {
            Some(IconSlot::Ready(texture)) => return Some(texture.clone()),
            Some(IconSlot::Pending) | Some(IconSlot::Missing) => return None,
            None => {}
        }
        let request = IconRequest {
            icon_ref: icon_ref.to_string(),
            size: self.side,
        };
        if self.req_tx.send(request).is_err() {
            warn!("icon worker is gone, {icon_ref} keeps the placeholder");
            self.slots.insert(icon_ref.to_string(), IconSlot::Missing);
        } else {
            self.slots.insert(icon_ref.to_string(), IconSlot::Pending);
        }
        None
    }
}

/// Last window placement sent to the viewport, so commands are only issued
/// when the anchors actually change.
#[derive(Default)]
pub struct WindowSync {
    applied: Option<egui::Rect>,
}

impl WindowSync {
    pub fn needs_update(&mut self, rect: egui::Rect) -> bool {
        if self.applied == Some(rect) {
            return false;
        }
        self.applied = Some(rect);
        true
    }
}

/// Holds a shortcut reload until no transition is running, so the file is
/// never touched mid-animation.
#[derive(Default)]
pub struct ReloadGate {
    pending: bool,
}

impl ReloadGate {
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Returns `true` once per request, on the first settled frame.
    pub fn take_when_settled(&mut self, animating: bool) -> bool {
        if animating || !self.pending {
            return false;
        }
        self.pending = false;
        true
    }
}
