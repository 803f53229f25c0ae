use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use compliance_validation::{
    FieldError, FieldValue, FormState, FormValues, SchemaError, ValidationReport,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::handler::SubmitHandler;
use crate::kind::FormKind;

/// Submission state of a form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
}

/// Why a submit call was dropped without validation or delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The form is externally disabled.
    Disabled,
    /// A submission is already in flight. Dropped, not queued.
    InFlight,
}

/// Result of a submit attempt that did not fail in the collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome<F: compliance_validation::FormField> {
    /// The payload was delivered and the collaborator returned.
    Submitted,
    /// Nothing happened.
    Dropped(DropReason),
    /// Validation failed; every field is now touched.
    Invalid(ValidationReport<F>),
}

impl<F: compliance_validation::FormField> SubmitOutcome<F> {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Form Submission Controller.
///
/// Owns one form instance's [`FormState`] and enforces the single-flight
/// state machine:
///
/// `Idle --submit(valid)--> Submitting --collaborator returns--> Idle`
///
/// All methods take `&self`; a submit arriving while another is in flight
/// is rejected by state, never queued. The state lock is never held across
/// the collaborator await.
pub struct FormController<K: FormKind> {
    kind: K,
    state: Mutex<FormState<K::Field>>,
    submitting: AtomicBool,
    disabled: AtomicBool,
}

impl<K: FormKind> FormController<K> {
    pub fn new(kind: K) -> Result<Self, SchemaError> {
        let schema = Arc::new(kind.schema()?);
        let state = FormState::with_values(schema, kind.initial_values());
        Ok(Self {
            kind,
            state: Mutex::new(state),
            submitting: AtomicBool::new(false),
            disabled: AtomicBool::new(false),
        })
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn status(&self) -> SubmissionStatus {
        if self.submitting.load(Ordering::Acquire) {
            SubmissionStatus::Submitting
        } else {
            SubmissionStatus::Idle
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Acquire)
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Release);
    }

    pub fn set_live_validation(&self, enabled: bool) {
        self.lock_state().set_live_validation(enabled);
    }

    pub fn set_value(&self, field: K::Field, value: impl Into<FieldValue>) {
        self.lock_state().set_value(field, value);
    }

    pub fn blur(&self, field: K::Field) {
        self.lock_state().blur(field);
    }

    pub fn visible_error(&self, field: K::Field) -> Option<FieldError> {
        self.lock_state().visible_error(field).cloned()
    }

    pub fn is_touched(&self, field: K::Field) -> bool {
        self.lock_state().is_touched(field)
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> FormValues<K::Field> {
        self.lock_state().values().clone()
    }

    pub fn validate_all(&self) -> ValidationReport<K::Field> {
        self.lock_state().validate_all()
    }

    /// Discard values, touched flags and computed errors (dialog closed,
    /// form unmounted). An in-flight submission is not cancelled; it still
    /// returns the controller to `Idle` when the collaborator finishes.
    pub fn reset(&self) {
        self.lock_state().reset();
    }

    /// Read access to the underlying state.
    pub fn with_state<R>(&self, f: impl FnOnce(&FormState<K::Field>) -> R) -> R {
        f(&self.lock_state())
    }

    /// Attempt a submission.
    ///
    /// Dropped when disabled or already submitting. Otherwise validates the
    /// whole form (touching every field); an invalid form is never
    /// submitted. A valid form enters `Submitting`, builds the sanitized
    /// payload with a UTC timestamp and awaits the collaborator. The status
    /// returns to `Idle` whatever the collaborator does, including panicking
    /// or being cancelled. A collaborator error is returned unchanged.
    pub async fn submit<H>(&self, handler: &H) -> Result<SubmitOutcome<K::Field>, H::Error>
    where
        H: SubmitHandler<K::Payload> + ?Sized,
    {
        if self.is_disabled() {
            debug!(form = K::NAME, "Submit ignored: form disabled");
            return Ok(SubmitOutcome::Dropped(DropReason::Disabled));
        }
        if self.status() == SubmissionStatus::Submitting {
            debug!(form = K::NAME, "Submit dropped: submission already in flight");
            return Ok(SubmitOutcome::Dropped(DropReason::InFlight));
        }

        let (_in_flight, payload) = {
            let mut state = self.lock_state();
            let report = state.validate_all();
            if !report.is_valid() {
                debug!(
                    form = K::NAME,
                    errors = report.len(),
                    "Submit blocked: form invalid"
                );
                return Ok(SubmitOutcome::Invalid(report));
            }

            let Some(guard) = InFlightGuard::claim(&self.submitting) else {
                debug!(form = K::NAME, "Submit dropped: submission already in flight");
                return Ok(SubmitOutcome::Dropped(DropReason::InFlight));
            };
            (guard, self.kind.payload(state.values(), Utc::now()))
        };

        info!(form = K::NAME, "Submission started");
        match handler.submit(payload).await {
            Ok(()) => {
                info!(form = K::NAME, "Submission completed");
                Ok(SubmitOutcome::Submitted)
            }
            Err(err) => {
                warn!(form = K::NAME, error = %err, "Submission rejected by collaborator");
                Err(err)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState<K::Field>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds the `Submitting` flag; dropping it returns the form to `Idle`.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
