use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ConfirmationError;

/// How the user confirms a destructive action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConfirmationMode {
    /// Type `expected` exactly (case-sensitive, no trimming).
    ExactText { expected: String },
    /// Tick an acknowledgement checkbox.
    Acknowledgement,
}

impl ConfirmationMode {
    pub fn exact_text(expected: impl Into<String>) -> Self {
        ConfirmationMode::ExactText {
            expected: expected.into(),
        }
    }
}

impl Default for ConfirmationMode {
    fn default() -> Self {
        ConfirmationMode::exact_text("DELETE")
    }
}

/// What the user has entered so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateInput<'a> {
    Typed(&'a str),
    Acknowledged(bool),
}

/// Whether `input` satisfies `mode`. Input of the wrong kind never does.
pub fn gate_open(mode: &ConfirmationMode, input: GateInput<'_>) -> bool {
    match (mode, input) {
        (ConfirmationMode::ExactText { expected }, GateInput::Typed(typed)) => typed == expected,
        (ConfirmationMode::Acknowledgement, GateInput::Acknowledged(checked)) => checked,
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogState {
    Closed,
    Open,
}

/// Receipt for a confirmed destructive action.
///
/// The gate never performs the action; the caller hands this to its
/// deletion collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub id: Uuid,
    pub mode: ConfirmationMode,
    pub confirmed_at: DateTime<Utc>,
}

/// Confirmation gate guarding a destructive-action dialog.
///
/// Typed text and the checkbox are cleared on every open/close transition,
/// so a confirmation from one episode can never carry into the next.
#[derive(Clone, Debug)]
pub struct ConfirmationGate {
    mode: ConfirmationMode,
    dialog: DialogState,
    typed: String,
    acknowledged: bool,
}

impl ConfirmationGate {
    pub fn new(mode: ConfirmationMode) -> Result<Self, ConfirmationError> {
        if let ConfirmationMode::ExactText { expected } = &mode {
            if expected.is_empty() {
                return Err(ConfirmationError::EmptyExpectedText);
            }
        }
        Ok(Self {
            mode,
            dialog: DialogState::Closed,
            typed: String::new(),
            acknowledged: false,
        })
    }

    pub fn mode(&self) -> &ConfirmationMode {
        &self.mode
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog == DialogState::Open
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Closed -> Open. Starts a fresh episode; opening an open dialog is a no-op.
    pub fn open_dialog(&mut self) {
        if self.dialog == DialogState::Open {
            return;
        }
        self.clear();
        self.dialog = DialogState::Open;
        debug!("Confirmation dialog opened");
    }

    pub fn close_dialog(&mut self) {
        if self.dialog == DialogState::Closed {
            return;
        }
        self.clear();
        self.dialog = DialogState::Closed;
        debug!("Confirmation dialog closed");
    }

    pub fn set_typed(&mut self, text: impl Into<String>) {
        if !self.is_dialog_open() {
            debug!("Typed confirmation ignored: dialog closed");
            return;
        }
        self.typed = text.into();
    }

    pub fn set_acknowledged(&mut self, checked: bool) {
        if !self.is_dialog_open() {
            debug!("Acknowledgement ignored: dialog closed");
            return;
        }
        self.acknowledged = checked;
    }

    /// True only while the dialog is open and the confirmation holds.
    pub fn proceed_allowed(&self) -> bool {
        self.is_dialog_open() && gate_open(&self.mode, self.input())
    }

    /// Issue a receipt and close the dialog.
    pub fn confirm(&mut self) -> Result<Confirmation, ConfirmationError> {
        if !self.is_dialog_open() {
            return Err(ConfirmationError::DialogClosed);
        }
        if !gate_open(&self.mode, self.input()) {
            return Err(ConfirmationError::NotSatisfied);
        }

        let confirmation = Confirmation {
            id: Uuid::new_v4(),
            mode: self.mode.clone(),
            confirmed_at: Utc::now(),
        };
        info!(confirmation_id = %confirmation.id, "Destructive action confirmed");
        self.close_dialog();
        Ok(confirmation)
    }

    fn input(&self) -> GateInput<'_> {
        match self.mode {
            ConfirmationMode::ExactText { .. } => GateInput::Typed(&self.typed),
            ConfirmationMode::Acknowledgement => GateInput::Acknowledged(self.acknowledged),
        }
    }

    fn clear(&mut self) {
        self.typed.clear();
        self.acknowledged = false;
    }
}
