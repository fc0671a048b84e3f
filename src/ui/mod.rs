// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for managing student records.
//! Handles layout, the worker pool that talks to the backend, and message routing.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::logic::api::StudentsApi;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::{student_form, student_table};

/// Stateful egui application mirroring the backend's student collection.
pub struct StudentDeskApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
    backend_label: String,
}

impl StudentDeskApp {
    /// Spawn the command workers and queue the initial list fetch.
    ///
    /// Each worker wakes the UI through `ctx` after delivering a result, so the
    /// view repaints as soon as server state changes.
    pub fn new(ctx: &egui::Context, api: Arc<dyn StudentsApi>, backend_label: String) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let api = Arc::clone(&api);
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(api.as_ref(), cmd);
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                    ctx.request_repaint();
                }
            });
        }
        tracing::info!(workers = threads, backend = %backend_label, "command workers started");

        Self {
            model: AppModel::default(),
            inbox: vec![Msg::RefreshRequested],
            cmd_tx,
            msg_rx,
            backend_label,
        }
    }
}

impl eframe::App for StudentDeskApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which eframe
    /// still invokes each frame before `ui`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker results, applies queued messages
    /// to the model, dispatches resulting commands, then renders the top bar,
    /// error modal, status bar, form, and student table. Views may emit further
    /// messages, which are processed on the next frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Process pending messages in arrival order.
        let msgs = std::mem::take(&mut self.inbox);
        let had_msgs = !msgs.is_empty();
        for msg in msgs {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Student Management");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    ui.label(
                        egui::RichText::new(&self.backend_label)
                            .small()
                            .color(egui::Color32::from_gray(110)),
                    )
                    .on_hover_text("Backend base URL");
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_form_section(ui);
                ui.add_space(16.0);

                self.render_list_section(ui);
                ui.add_space(8.0);
            });
        });

        // Messages raised by the views above are handled on the next frame.
        if had_msgs || !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl StudentDeskApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    fn render_form_section(&mut self, ui: &mut egui::Ui) {
        let msgs = student_form::view(ui, &self.model.form);
        self.inbox.extend(msgs.into_iter().map(Msg::Form));
    }

    fn render_list_section(&mut self, ui: &mut egui::Ui) {
        let editing = self.model.form.mode().editing_id();
        let msgs = student_table::view(ui, &self.model.list, editing);
        self.inbox.extend(msgs.into_iter().map(Msg::Table));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Request failed")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        let text = self.model.status.as_deref().unwrap_or("Ready.");
        let display = if self.model.pending_commands > 0 {
            format!("{}  ({} working…)", text, self.model.pending_commands)
        } else {
            text.to_string()
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!(
                        "{} request(s) in flight",
                        self.model.pending_commands
                    ));
            }
        });
    }
}
