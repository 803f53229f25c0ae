//! # compliance-consent
//!
//! Consent & Confirmation State Model.
//!
//! ## Consent
//!
//! A [`ConsentRecord`] maps category ids to granted flags. Required
//! categories (the `necessary` cookie category) are pinned to granted: grant,
//! withdraw and toggle are no-ops for them, and bulk operations never touch
//! them. Every mutation of an optional category returns the full updated
//! record so the caller can persist or broadcast it.
//!
//! ## Confirmation
//!
//! A [`ConfirmationGate`] reports whether a destructive action may proceed.
//! It never performs the action itself. Typed text and the acknowledgement
//! checkbox are cleared whenever the guarded dialog opens or closes.

pub mod banner;
pub mod category;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod record;

pub use banner::CookieBanner;
pub use category::{CategoryCatalog, CategoryId, ConsentCategory};
pub use config::{ConfirmationConfig, ConfirmationKind, ConsentConfig};
pub use confirmation::{
    gate_open, Confirmation, ConfirmationGate, ConfirmationMode, DialogState, GateInput,
};
pub use error::{ConfirmationError, ConsentError};
pub use record::{ConsentAction, ConsentChange, ConsentPreferences, ConsentRecord};
