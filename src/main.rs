#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

mod anchor;
mod app;
mod branding;
mod config;
mod events;
mod grid;
mod icons;
mod panel;
mod registry;
mod reveal;
mod system;

use crate::app::{startup_window_size, LauncherApp};
use crate::branding::APP_DISPLAY_NAME;
use crate::config::AppConfig;
use eframe::egui;
use env_logger::Env;
use log::info;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::load();
    info!(
        "starting {APP_DISPLAY_NAME} (reveal {} ms, fade {} ms)",
        config.reveal_ms, config.fade_ms
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_DISPLAY_NAME)
            .with_inner_size(startup_window_size(&config))
            .with_resizable(false)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_taskbar(false)
            .with_visible(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_DISPLAY_NAME,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            install_font_fallback(&cc.egui_ctx);
            Ok(Box::new(LauncherApp::new(cc, config)))
        }),
    )
}

// Shortcut names come from the user's file and may use any script; the
// bundled fonts only cover Latin.
fn install_font_fallback(ctx: &egui::Context) {
    let candidates: &[(&str, &str)] = if cfg!(windows) {
        &[
            ("segoe_ui", r"C:\Windows\Fonts\segoeui.ttf"),
            ("yahei", r"C:\Windows\Fonts\msyh.ttc"),
        ]
    } else {
        &[
            ("noto_sans", "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf"),
            ("dejavu_sans", "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        ]
    };

    let mut fonts = egui::FontDefinitions::default();
    let mut installed = false;
    for (name, path) in candidates {
        let Ok(data) = std::fs::read(path) else {
            continue;
        };
        fonts
            .font_data
            .insert(name.to_string(), egui::FontData::from_owned(data));
        if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
            family.push(name.to_string());
        }
        installed = true;
    }

    if installed {
        ctx.set_fonts(fonts);
    }
}
