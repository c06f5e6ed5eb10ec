mod runtime;
mod state;
mod style;
mod ui;

use crate::anchor::AnchorPositioner;
use crate::config::{apps_file_path, AppConfig};
use crate::events::IconResult;
use crate::grid::{IconGridView, LaunchFn};
use crate::icons::placeholder_image;
use crate::panel::{PanelStateMachine, Timings, ToggleOutcome};
use crate::registry::{AppRegistry, ShortcutEntry};
use crossbeam_channel::Receiver;
use eframe::egui;
use log::{debug, info};
use state::{IconLoader, ReloadGate, WindowSync};
use std::time::Instant;

// Used until the first frame reports the real monitor size.
const FALLBACK_SCREEN: egui::Vec2 = egui::Vec2::new(1920.0, 1080.0);

pub struct LauncherApp {
    config: AppConfig,
    registry: AppRegistry,
    entries: Vec<ShortcutEntry>,
    panel: PanelStateMachine,
    grid: IconGridView<egui::TextureHandle>,
    icons: IconLoader,
    icon_rx: Receiver<IconResult>,
    placeholder: egui::TextureHandle,
    window: WindowSync,
    reload: ReloadGate,
    screen: egui::Rect,
}

impl LauncherApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let registry = AppRegistry::new(apps_file_path());
        let entries = registry.load();
        info!(
            "loaded {} shortcuts from {}",
            entries.len(),
            registry.path().display()
        );

        let screen = egui::Rect::from_min_size(egui::Pos2::ZERO, FALLBACK_SCREEN);
        let panel = PanelStateMachine::new(
            Timings {
                reveal: config.reveal_duration(),
                fade: config.fade_duration(),
            },
            config.diagonal_factor,
            positioner_for(&config),
            screen,
        );

        let runtime = runtime::build_runtime(&cc.egui_ctx);
        let icon_px = (style::ICON_SIDE * 2.0) as u32;
        let placeholder = cc.egui_ctx.load_texture(
            "icon:placeholder",
            placeholder_image(icon_px as usize),
            egui::TextureOptions::LINEAR,
        );

        let mut app = Self {
            config,
            registry,
            entries,
            panel,
            grid: IconGridView::new(),
            icons: IconLoader::new(runtime.icon_req_tx, icon_px),
            icon_rx: runtime.icon_rx,
            placeholder,
            window: WindowSync::default(),
            reload: ReloadGate::default(),
            screen,
        };
        app.refresh_grid();
        app
    }

    fn refresh_grid(&mut self) {
        let launch: LaunchFn = Box::new(crate::system::launch);
        self.grid.populate(
            &self.entries,
            self.config.grid_columns as usize,
            &mut self.icons,
            launch,
        );
    }

    /// Re-reads the shortcut file and rebuilds the grid from scratch.
    fn reload_shortcuts(&mut self) {
        self.entries = self.registry.load();
        self.icons.invalidate();
        self.refresh_grid();
        info!("reloaded {} shortcuts", self.entries.len());
    }

    fn toggle_panel(&mut self) {
        match self.panel.toggle(Instant::now(), self.screen) {
            ToggleOutcome::Started(direction) => debug!("panel {direction:?}"),
            ToggleOutcome::Ignored => {}
        }
    }

    fn attach_icon(&mut self, ctx: &egui::Context, result: IconResult) {
        if let Some((icon_ref, texture)) = self.icons.complete(ctx, result) {
            self.grid.attach_icon(&icon_ref, &texture);
        }
    }
}

fn positioner_for(config: &AppConfig) -> AnchorPositioner {
    AnchorPositioner {
        anchor_fraction: config.anchor_fraction,
        top_margin: config.top_margin,
        trigger_size: egui::vec2(config.panel_width, config.trigger_height),
        panel_size: egui::vec2(config.panel_width, config.panel_height),
    }
}

/// Initial inner size of the window: just the trigger.
pub fn startup_window_size(config: &AppConfig) -> egui::Vec2 {
    egui::vec2(config.panel_width, config.trigger_height)
}
