// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring logging, the HTTP client, and egui/eframe.

use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;
use egui_phosphor::Variant;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::logic::api::HttpStudentsApi;
use crate::ui::StudentDeskApp;

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: Config) -> Result<()> {
    let api = HttpStudentsApi::new(&config.api_base_url, config.request_timeout())
        .context("Failed to set up the backend client")?;
    let backend_label = api.base_url().to_string();
    tracing::info!(backend = %backend_label, timeout_secs = config.request_timeout_secs, "starting studentdesk");
    let api = Arc::new(api);

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Student Management",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(StudentDeskApp::new(
                &cc.egui_ctx,
                api,
                backend_label,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("UI event loop failed: {err}"))
}
