use thiserror::Error;

/// Errors surfaced by the generation gateway. Validation problems map to
/// 400s at the HTTP boundary, everything else to 500s.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("The AI returned {0} in an unexpected format. Please try again.")]
    UpstreamFormat(&'static str),

    #[error("API key is not configured on the server.")]
    MissingApiKey,

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl GatewayError {
    /// True for errors the caller can fix by correcting the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GatewayError::InvalidRequest(_))
    }
}
