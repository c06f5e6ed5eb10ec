use crate::config::resolve_install_relative;
use crate::events::{IconRequest, IconResult};
use crate::icons::load_icon_image;
use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use log::{debug, error};
use std::thread;

pub struct RuntimeHandles {
    pub icon_req_tx: Sender<IconRequest>,
    pub icon_rx: Receiver<IconResult>,
}

pub fn build_runtime(ctx: &egui::Context) -> RuntimeHandles {
    let (icon_req_tx, icon_req_rx) = unbounded::<IconRequest>();
    let (icon_tx, icon_rx) = unbounded::<IconResult>();

    spawn_icon_worker(icon_req_rx, icon_tx, ctx.clone());

    RuntimeHandles {
        icon_req_tx,
        icon_rx,
    }
}

// Decodes icons off the UI thread. The worker exits once every request
// sender is gone.
fn spawn_icon_worker(
    requests: Receiver<IconRequest>,
    results: Sender<IconResult>,
    ctx: egui::Context,
) {
    let spawned = thread::Builder::new()
        .name("squid-icons".to_string())
        .spawn(move || {
            while let Ok(req) = requests.recv() {
                let side = req.size.clamp(16, 256) as usize;
                let path = resolve_install_relative(&req.icon_ref);
                let image = load_icon_image(&path, side);
                if image.is_none() {
                    debug!("icon {} unresolved, keeping placeholder", path.display());
                }
                if results
                    .send(IconResult {
                        icon_ref: req.icon_ref,
                        image,
                    })
                    .is_err()
                {
                    break;
                }
                ctx.request_repaint();
            }
        });
    if let Err(err) = spawned {
        error!("failed to start icon worker: {err}; all icons use the placeholder");
    }
}
