//! Concrete forms of the compliance UI.

pub mod export;
pub mod gdpr;
pub mod login;
pub mod register;

pub use export::{DataExportForm, ExportConfig, ExportField, ExportRequestPayload};
pub use gdpr::{
    GdprField, GdprInitialData, GdprLimits, GdprRequestForm, GdprRequestPayload, RequestType,
};
pub use login::{LoginField, LoginForm, LoginPayload};
pub use register::{RegisterField, RegisterForm, RegistrationPayload};
