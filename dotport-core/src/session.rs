//! Modal session state: one open create/view/edit/delete dialog.

use serde::{Deserialize, Serialize};

use crate::fields::FieldDef;
use crate::validate::{validate, ValidationErrors};
use crate::value::{FieldValue, FieldValues};

/// What a session is for. Fixed when the session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalMode {
    Create,
    View,
    Edit,
    Delete,
}

impl ModalMode {
    /// Create and edit accept field input.
    pub fn is_editable(&self) -> bool {
        matches!(self, ModalMode::Create | ModalMode::Edit)
    }
}

/// The I/O a submission asks for. Sessions produce intent only; the table
/// engine owns the transport and executes these.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitRequest {
    /// Create (`id` absent) or update (`id` present) with the form payload.
    Save {
        id: Option<i64>,
        payload: FieldValues,
    },
    /// Delete the target record. Never validated.
    Delete { id: i64 },
}

/// State machine for one open modal.
///
/// A session never performs I/O. [`try_submit`](Self::try_submit) gates the
/// caller's network call: it validates (for create/edit), records errors,
/// sets the busy flag, and hands back the request to execute. The caller
/// reports failure via [`submission_failed`](Self::submission_failed),
/// which re-arms the session without losing the form.
#[derive(Debug, Clone)]
pub struct ModalSession {
    mode: ModalMode,
    target_id: Option<i64>,
    form: FieldValues,
    errors: ValidationErrors,
    submitting: bool,
}

impl ModalSession {
    /// Open a create dialog with an empty form, regardless of any state a
    /// previous session left behind.
    pub fn create() -> Self {
        Self::open(ModalMode::Create, None, FieldValues::new())
    }

    /// Open a read-only view seeded with the record's current values.
    pub fn view(id: i64, form: FieldValues) -> Self {
        Self::open(ModalMode::View, Some(id), form)
    }

    /// Open an edit dialog seeded with the record's current values.
    pub fn edit(id: i64, form: FieldValues) -> Self {
        Self::open(ModalMode::Edit, Some(id), form)
    }

    /// Open a delete confirmation for a record.
    pub fn delete(id: i64) -> Self {
        Self::open(ModalMode::Delete, Some(id), FieldValues::new())
    }

    fn open(mode: ModalMode, target_id: Option<i64>, form: FieldValues) -> Self {
        Self {
            mode,
            target_id,
            form,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    pub fn target_id(&self) -> Option<i64> {
        self.target_id
    }

    pub fn form(&self) -> &FieldValues {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.form.get(name)
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Store one field and clear that field's error without re-validating.
    /// Whether the new value is actually acceptable is resolved at the next
    /// submit, not here.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        self.errors.remove(&name);
        self.form.insert(name, value.into());
    }

    /// Gate a submission attempt.
    ///
    /// Returns the request the caller must execute, or `None` when there is
    /// nothing to do: view mode, an already in-flight submission, or a
    /// validation failure (in which case [`errors`](Self::errors) holds the
    /// per-field messages).
    pub fn try_submit(&mut self, fields: &[FieldDef]) -> Option<SubmitRequest> {
        if self.submitting {
            return None;
        }

        match self.mode {
            ModalMode::View => None,
            ModalMode::Delete => {
                let id = self.target_id?;
                self.submitting = true;
                Some(SubmitRequest::Delete { id })
            }
            ModalMode::Create | ModalMode::Edit => {
                let errors = validate(fields, &self.form);
                if !errors.is_empty() {
                    self.errors = errors;
                    return None;
                }

                self.errors.clear();
                self.submitting = true;
                Some(SubmitRequest::Save {
                    id: self.target_id,
                    payload: self.form.clone(),
                })
            }
        }
    }

    /// The submission came back with an error: clear the busy flag and keep
    /// the form and errors so the user can retry or cancel.
    pub fn submission_failed(&mut self) {
        self.submitting = false;
    }
}
