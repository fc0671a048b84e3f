// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use crate::logic::api::{ApiError, Operation, StudentsApi};
use crate::models::student::{Student, StudentId, StudentPayload};
use crate::ui::components::student_form::{
    self, StudentFormCommand, StudentFormModel, StudentFormMsg,
};
use crate::ui::components::student_table::{StudentListModel, StudentTableMsg};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Draft and create/edit mode.
    pub form: StudentFormModel,
    /// Last known server list.
    pub list: StudentListModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    RefreshRequested,
    StudentsLoaded {
        seq: u64,
        result: Result<Vec<Student>, ApiError>,
    },
    Form(StudentFormMsg),
    Table(StudentTableMsg),
    Saved {
        operation: Operation,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: StudentId,
        result: Result<(), ApiError>,
    },
    DismissError,
}

/// Commands represent side-effects executed off the UI thread.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchStudents { seq: u64 },
    CreateStudent(StudentPayload),
    UpdateStudent { id: StudentId, payload: StudentPayload },
    DeleteStudent(StudentId),
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::RefreshRequested | Msg::Table(StudentTableMsg::Refresh) => {
            request_refresh(model, cmds);
        }
        Msg::StudentsLoaded { seq, result } => match result {
            Ok(students) => {
                let count = students.len();
                if model.list.apply_fetch(seq, students) {
                    tracing::debug!(seq, count, "student list replaced");
                    if model.status.is_none() {
                        surface_event(model, format!("Loaded {count} student(s)."), false);
                    }
                } else {
                    tracing::debug!(seq, "discarding stale student list");
                }
            }
            Err(err) => {
                if model.list.fail_fetch(seq) {
                    report_failure(model, &err);
                } else {
                    tracing::debug!(seq, error = %err, "ignoring failure of stale student fetch");
                }
            }
        },
        Msg::Form(m) => forward_form(model, m, cmds),
        Msg::Table(StudentTableMsg::Edit(student)) => {
            forward_form(model, StudentFormMsg::BeginEdit(student), cmds);
        }
        Msg::Table(StudentTableMsg::Delete(id)) => {
            if model.list.begin_delete(id.clone()) {
                cmds.push(Command::DeleteStudent(id));
            }
        }
        Msg::Saved { operation, result } => match result {
            Ok(()) => {
                // Refetch before the draft is cleared.
                request_refresh(model, cmds);
                forward_form(model, StudentFormMsg::SaveSucceeded, cmds);
                let message = match operation {
                    Operation::Update => "Student updated.",
                    _ => "Student added.",
                };
                surface_event(model, message.to_string(), false);
            }
            Err(err) => {
                forward_form(model, StudentFormMsg::SaveFailed, cmds);
                report_failure(model, &err);
            }
        },
        Msg::Deleted { id, result } => {
            model.list.finish_delete(&id);
            match result {
                Ok(()) => {
                    request_refresh(model, cmds);
                    surface_event(model, "Student deleted.".to_string(), false);
                    forward_form(model, StudentFormMsg::RecordDeleted(id), cmds);
                }
                Err(err) => report_failure(model, &err),
            }
        }
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command against the backend and return the resulting message.
///
/// Blocks on the network; call from a worker thread.
pub fn run_command(api: &dyn StudentsApi, cmd: Command) -> Msg {
    match cmd {
        Command::FetchStudents { seq } => Msg::StudentsLoaded {
            seq,
            result: api.list(),
        },
        Command::CreateStudent(payload) => Msg::Saved {
            operation: Operation::Create,
            result: api.create(&payload),
        },
        Command::UpdateStudent { id, payload } => Msg::Saved {
            operation: Operation::Update,
            result: api.update(&id, &payload),
        },
        Command::DeleteStudent(id) => {
            let result = api.delete(&id);
            Msg::Deleted { id, result }
        }
    }
}

fn request_refresh(model: &mut AppModel, cmds: &mut Vec<Command>) {
    let seq = model.list.begin_fetch();
    cmds.push(Command::FetchStudents { seq });
}

/// Route a message to the form and translate its commands and feedback.
fn forward_form(model: &mut AppModel, msg: StudentFormMsg, cmds: &mut Vec<Command>) {
    let mut form_cmds = Vec::new();
    if let Some(event) = student_form::update(&mut model.form, msg, &mut form_cmds) {
        surface_event(model, event.message, event.is_error);
    }
    for c in form_cmds {
        match c {
            StudentFormCommand::Create(payload) => cmds.push(Command::CreateStudent(payload)),
            StudentFormCommand::Update { id, payload } => {
                cmds.push(Command::UpdateStudent { id, payload })
            }
        }
    }
}

/// Log a backend failure and surface it to the user. Nothing is retried.
fn report_failure(model: &mut AppModel, err: &ApiError) {
    tracing::error!(operation = ?err.operation(), error = %err, "backend request failed");
    surface_event(model, err.to_string(), true);
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
