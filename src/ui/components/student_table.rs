// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Student list: last known server state and the table that renders it.

use std::collections::HashSet;

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::models::student::{Student, StudentId};

const TABLE_HEADER_HEIGHT: f32 = 22.0;
const TABLE_ROW_HEIGHT: f32 = 26.0;

/// Mirror of the backend's student collection.
///
/// The list is only ever replaced wholesale by a fetch result; each fetch
/// carries a sequence number so a slow, older response cannot overwrite a
/// newer one.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct StudentListModel {
    students: Vec<Student>,
    loaded: bool,
    issued_seq: u64,
    applied_seq: u64,
    in_flight: usize,
    deleting: HashSet<StudentId>,
}

impl StudentListModel {
    /// Records in server order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Whether at least one fetch has succeeded.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Whether any fetch is still awaiting its response.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_deleting(&self, id: &StudentId) -> bool {
        self.deleting.contains(id)
    }

    /// Allocate the sequence number for a new fetch.
    pub fn begin_fetch(&mut self) -> u64 {
        self.issued_seq += 1;
        self.in_flight += 1;
        self.issued_seq
    }

    /// Replace the list with a fetch result. Returns `false` and leaves the
    /// list untouched when a newer result was already applied.
    pub fn apply_fetch(&mut self, seq: u64, students: Vec<Student>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if seq <= self.applied_seq {
            return false;
        }
        self.students = students;
        self.applied_seq = seq;
        self.loaded = true;
        true
    }

    /// Mark a fetch as finished without data; the list is left as it was.
    /// Returns `false` when a newer result was already applied, so the
    /// failure no longer concerns what is on screen.
    pub fn fail_fetch(&mut self, seq: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        seq > self.applied_seq
    }

    pub fn begin_delete(&mut self, id: StudentId) -> bool {
        self.deleting.insert(id)
    }

    pub fn finish_delete(&mut self, id: &StudentId) {
        self.deleting.remove(id);
    }
}

/// Row actions and list-level requests from the table view.
#[derive(Clone, Debug, PartialEq)]
pub enum StudentTableMsg {
    Refresh,
    Edit(Student),
    Delete(StudentId),
}

/// Render the student table and return any messages triggered by user interaction.
///
/// `editing` highlights the row whose record is loaded into the form.
pub fn view(
    ui: &mut egui::Ui,
    model: &StudentListModel,
    editing: Option<&StudentId>,
) -> Vec<StudentTableMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.heading("Student List");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let button = egui::Button::new(format!(
                "{} Refresh",
                egui_phosphor::regular::ARROWS_CLOCKWISE
            ));
            if ui
                .add_enabled(!model.is_refreshing(), button)
                .on_hover_text("Reload the list from the server")
                .clicked()
            {
                msgs.push(StudentTableMsg::Refresh);
            }
        });
    });
    ui.add_space(6.0);

    if !model.loaded() && !model.is_refreshing() {
        ui.label(
            egui::RichText::new("Students could not be loaded. Use Refresh to try again.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
        return msgs;
    }

    if !model.loaded() {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new().size(14.0));
            ui.label(
                egui::RichText::new("Loading students…")
                    .italics()
                    .color(egui::Color32::from_gray(110)),
            );
        });
        return msgs;
    }

    if model.students().is_empty() {
        ui.label(
            egui::RichText::new("No students yet.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
        return msgs;
    }

    render_table(ui, model, editing, &mut msgs);
    msgs
}

fn render_table(
    ui: &mut egui::Ui,
    model: &StudentListModel,
    editing: Option<&StudentId>,
    msgs: &mut Vec<StudentTableMsg>,
) {
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(180.0).resizable(true))
        .column(Column::initial(220.0).resizable(true))
        .column(Column::initial(70.0).resizable(true))
        .column(Column::remainder())
        .header(TABLE_HEADER_HEIGHT, |mut header| {
            for title in ["Name", "Email", "Mark", "Actions"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for student in model.students() {
                let is_editing = editing == Some(&student.id);
                body.row(TABLE_ROW_HEIGHT, |mut row| {
                    row.set_selected(is_editing);
                    row.col(|ui| {
                        ui.label(&student.name);
                    });
                    row.col(|ui| {
                        ui.label(&student.email);
                    });
                    row.col(|ui| {
                        ui.label(student.mark.to_string());
                    });
                    row.col(|ui| {
                        render_row_actions(ui, model, student, msgs);
                    });
                });
            }
        });
}

/// Edit and delete buttons for a single row.
fn render_row_actions(
    ui: &mut egui::Ui,
    model: &StudentListModel,
    student: &Student,
    msgs: &mut Vec<StudentTableMsg>,
) {
    if ui
        .button(format!("{} Edit", egui_phosphor::regular::PENCIL_SIMPLE))
        .clicked()
    {
        msgs.push(StudentTableMsg::Edit(student.clone()));
    }

    let deleting = model.is_deleting(&student.id);
    let delete = egui::Button::new(
        egui::RichText::new(format!("{} Delete", egui_phosphor::regular::TRASH_SIMPLE))
            .color(egui::Color32::from_rgb(200, 60, 60)),
    );
    if ui
        .add_enabled(!deleting, delete)
        .on_disabled_hover_text("Deleting…")
        .clicked()
    {
        msgs.push(StudentTableMsg::Delete(student.id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::Mark;

    fn student(id: &str, mark: f64) -> Student {
        Student {
            id: StudentId::new(id),
            name: format!("Student {id}"),
            email: format!("s{id}@x.com"),
            mark: Mark::new(mark),
        }
    }

    #[test]
    fn newer_fetch_wins_over_late_older_response() {
        let mut model = StudentListModel::default();
        let first = model.begin_fetch();
        let second = model.begin_fetch();

        assert!(model.apply_fetch(second, vec![student("1", 95.0)]));
        assert!(!model.apply_fetch(first, vec![student("1", 90.0)]));

        assert_eq!(model.students(), &[student("1", 95.0)]);
        assert!(!model.is_refreshing());
    }

    #[test]
    fn list_is_not_loaded_until_first_fetch_applies() {
        let mut model = StudentListModel::default();
        let seq = model.begin_fetch();
        assert!(!model.loaded());
        assert!(model.is_refreshing());

        model.apply_fetch(seq, Vec::new());

        assert!(model.loaded());
        assert!(model.students().is_empty());
    }

    #[test]
    fn failed_fetch_clears_refreshing_and_keeps_list() {
        let mut model = StudentListModel::default();
        let seq = model.begin_fetch();
        model.apply_fetch(seq, vec![student("1", 90.0)]);

        let failing = model.begin_fetch();
        assert!(model.fail_fetch(failing));

        assert!(!model.is_refreshing());
        assert_eq!(model.students(), &[student("1", 90.0)]);
    }

    #[test]
    fn failure_of_superseded_fetch_is_stale() {
        let mut model = StudentListModel::default();
        let first = model.begin_fetch();
        let second = model.begin_fetch();
        model.apply_fetch(second, vec![student("1", 95.0)]);

        assert!(!model.fail_fetch(first));
        assert!(!model.is_refreshing());
        assert_eq!(model.students(), &[student("1", 95.0)]);
    }

    #[test]
    fn delete_tracking_is_per_id() {
        let mut model = StudentListModel::default();

        assert!(model.begin_delete(StudentId::new("1")));
        assert!(!model.begin_delete(StudentId::new("1")));
        assert!(model.is_deleting(&StudentId::new("1")));
        assert!(!model.is_deleting(&StudentId::new("2")));

        model.finish_delete(&StudentId::new("1"));
        assert!(!model.is_deleting(&StudentId::new("1")));
    }
}
