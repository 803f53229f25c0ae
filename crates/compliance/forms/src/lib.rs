//! # compliance-forms
//!
//! Form Submission Controller for the Compliance Interaction Core.
//!
//! A [`FormController`] owns one form instance and enforces single-flight
//! submission: a submit attempt while disabled or while another submission is
//! in flight is dropped, an invalid form is never handed to the collaborator,
//! and the controller always returns to `Idle` once the collaborator finishes.
//!
//! ```text
//! Idle --submit(valid)--> Submitting --collaborator returns--> Idle
//!   \--submit(invalid)--> Idle (every field touched)
//! ```
//!
//! Forms are described by [`FormKind`]; the registration, GDPR request, login
//! and data export forms live in [`forms`].

pub mod controller;
pub mod forms;
pub mod handler;
pub mod kind;
pub mod mocks;

pub use controller::{DropReason, FormController, SubmissionStatus, SubmitOutcome};
pub use handler::SubmitHandler;
pub use kind::FormKind;
