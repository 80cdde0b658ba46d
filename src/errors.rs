use thiserror::Error;

/// Classified failure of a single panel API call.
///
/// The remote protocol is schema-less and providers sit behind flaky reverse
/// proxies, so every response is classified before anyone tries to use it:
/// transport first, then body shape, then the provider's own `error` field.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Missing or empty credentials. Checked before any request is built.
    #[error("provider is not configured: {0}")]
    Configuration(String),

    /// Non-2xx HTTP status, or the request never completed. The status code
    /// is preserved when one was received.
    #[error("transport error: {message}")]
    Transport { status: Option<u16>, message: String },

    /// 2xx response with an empty body.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The body is an HTML page, not JSON. Seen in practice when the
    /// provider's reverse proxy serves a maintenance page.
    #[error("provider returned HTML instead of JSON")]
    Protocol,

    /// The body is not parseable JSON, or parsed JSON is missing a field the
    /// action's contract requires. Carries a truncated snippet of the raw
    /// body for diagnostics.
    #[error("malformed provider response: {detail} (body: {snippet:?})")]
    Malformed { detail: String, snippet: String },

    /// The provider answered with a business error (`{"error": ...}`),
    /// relayed verbatim.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Engine-level error surfaced to the caller that issued an operation
/// (the CLI here; an admin HTTP layer in a full deployment).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("provider not found")]
    ProviderNotFound,

    #[error("provider is disabled")]
    ProviderDisabled,

    #[error(transparent)]
    Panel(#[from] PanelError),

    /// Store or other infrastructure failure.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
