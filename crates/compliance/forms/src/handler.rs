use async_trait::async_trait;

/// The external submit collaborator (network, storage, ...).
///
/// The controller awaits it only to know when to return to `Idle`; it never
/// interprets success or failure. A failure is handed back to the caller
/// unchanged.
#[async_trait]
pub trait SubmitHandler<P: Send + 'static>: Send + Sync {
    /// Opaque failure of the collaborator.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver a validated, sanitized payload.
    async fn submit(&self, payload: P) -> Result<(), Self::Error>;
}
