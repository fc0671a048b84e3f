// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Student form: draft editing, create/edit mode, and submit dispatch.

use eframe::egui;

use crate::models::student::{
    Student, StudentDraft, StudentField, StudentId, StudentPayload, validate_draft,
};

/// Whether submitting creates a new record or updates an existing one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit(StudentId),
}

impl FormMode {
    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Create => "Add Student",
            Self::Edit(_) => "Update Student",
        }
    }

    /// Id of the record being edited, if any.
    pub fn editing_id(&self) -> Option<&StudentId> {
        match self {
            Self::Create => None,
            Self::Edit(id) => Some(id),
        }
    }
}

/// Form state, kept free of side effects.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct StudentFormModel {
    draft: StudentDraft,
    mode: FormMode,
    submitting: bool,
}

impl StudentFormModel {
    pub fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// True while a create/update request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit is offered only for a complete, well-formed draft and no request in flight.
    pub fn can_submit(&self) -> bool {
        !self.submitting && validate_draft(&self.draft).is_none()
    }
}

/// Messages handled by the form.
#[derive(Clone, Debug, PartialEq)]
pub enum StudentFormMsg {
    FieldChanged(StudentField, String),
    Submit,
    BeginEdit(Student),
    CancelEdit,
    SaveSucceeded,
    SaveFailed,
    RecordDeleted(StudentId),
}

/// Requests the form needs the backend to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum StudentFormCommand {
    Create(StudentPayload),
    Update {
        id: StudentId,
        payload: StudentPayload,
    },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentFormEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the form. Returns a feedback event when relevant.
pub fn update(
    model: &mut StudentFormModel,
    msg: StudentFormMsg,
    cmds: &mut Vec<StudentFormCommand>,
) -> Option<StudentFormEvent> {
    match msg {
        StudentFormMsg::FieldChanged(field, value) => {
            model.draft.set(field, value);
            None
        }
        StudentFormMsg::Submit => submit(model, cmds),
        StudentFormMsg::BeginEdit(student) => {
            model.draft = StudentDraft::from_student(&student);
            model.mode = FormMode::Edit(student.id);
            None
        }
        StudentFormMsg::CancelEdit => {
            reset(model);
            None
        }
        StudentFormMsg::SaveSucceeded => {
            model.submitting = false;
            reset(model);
            None
        }
        StudentFormMsg::SaveFailed => {
            // Draft and mode stay as they were so the user can retry.
            model.submitting = false;
            None
        }
        StudentFormMsg::RecordDeleted(id) => {
            if model.mode.editing_id() == Some(&id) {
                reset(model);
                return Some(StudentFormEvent {
                    message: "The student being edited was deleted; form reset.".into(),
                    is_error: false,
                });
            }
            None
        }
    }
}

/// Validate the draft and enqueue a create or update depending on mode.
fn submit(
    model: &mut StudentFormModel,
    cmds: &mut Vec<StudentFormCommand>,
) -> Option<StudentFormEvent> {
    if model.submitting {
        return None;
    }

    let payload = match model.draft.to_payload() {
        Ok(payload) => payload,
        Err(err) => {
            return Some(StudentFormEvent {
                message: err.to_string(),
                is_error: true,
            });
        }
    };

    let message = match &model.mode {
        FormMode::Create => {
            cmds.push(StudentFormCommand::Create(payload));
            "Adding student..."
        }
        FormMode::Edit(id) => {
            cmds.push(StudentFormCommand::Update {
                id: id.clone(),
                payload,
            });
            "Updating student..."
        }
    };
    model.submitting = true;

    Some(StudentFormEvent {
        message: message.into(),
        is_error: false,
    })
}

fn reset(model: &mut StudentFormModel) {
    model.draft = StudentDraft::default();
    model.mode = FormMode::Create;
}

/// Whether `text` could be typed into a numeric input, including partial
/// states such as `-` or `1e`.
///
/// Accepts an optional leading sign, digits with at most one decimal point,
/// and an optional `e`/`E` exponent with its own optional sign.
pub fn accepts_numeric_input(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let mantissa_ok = mantissa.chars().all(|c| c.is_ascii_digit() || c == '.')
        && mantissa.matches('.').count() <= 1;
    let exponent_ok = exponent.is_none_or(|exponent| {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        mantissa.chars().any(|c| c.is_ascii_digit()) && digits.chars().all(|c| c.is_ascii_digit())
    });

    mantissa_ok && exponent_ok
}

/// Render the form and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &StudentFormModel) -> Vec<StudentFormMsg> {
    let mut msgs = Vec::new();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());

        if let Some(id) = model.mode.editing_id() {
            ui.label(
                egui::RichText::new(format!(
                    "{} Editing student {id}",
                    egui_phosphor::regular::PENCIL_SIMPLE
                ))
                .small()
                .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(4.0);
        }

        egui::Grid::new("student_form_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 10.0))
            .min_col_width(80.0)
            .show(ui, |ui| {
                for field in StudentField::ALL {
                    ui.label(field.label());
                    render_field_input(ui, model, field, &mut msgs);
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let button = egui::Button::new(format!(
                "{} {}",
                egui_phosphor::regular::FLOPPY_DISK,
                model.mode.submit_label()
            ));
            let hint = if model.is_submitting() {
                "Saving…"
            } else {
                "Please fill in every field with a valid value"
            };
            if ui
                .add_enabled(model.can_submit(), button)
                .on_disabled_hover_text(hint)
                .clicked()
            {
                msgs.push(StudentFormMsg::Submit);
            }

            // Cancel leaves edit mode; in create mode the same action just clears the draft.
            let reset_label = if model.mode.editing_id().is_some() {
                Some("Cancel")
            } else if !model.draft.is_empty() {
                Some("Clear")
            } else {
                None
            };
            if let Some(label) = reset_label
                && ui
                    .add_enabled(!model.is_submitting(), egui::Button::new(label))
                    .clicked()
            {
                msgs.push(StudentFormMsg::CancelEdit);
            }

            if model.is_submitting() {
                ui.add(egui::Spinner::new().size(14.0));
            }
        });
    });

    msgs
}

/// Render one text input bound to a draft field. Enter submits like a form would.
fn render_field_input(
    ui: &mut egui::Ui,
    model: &StudentFormModel,
    field: StudentField,
    msgs: &mut Vec<StudentFormMsg>,
) {
    let mut value = model.draft.get(field).to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut value)
            .hint_text(field.placeholder())
            .desired_width(280.0),
    );

    if response.changed() {
        let accepted = field != StudentField::Mark || accepts_numeric_input(&value);
        if accepted {
            msgs.push(StudentFormMsg::FieldChanged(field, value));
        }
    }

    let enter = response.lost_focus() && ui.input(|inp| inp.key_pressed(egui::Key::Enter));
    if enter && model.can_submit() {
        msgs.push(StudentFormMsg::Submit);
    }
}
