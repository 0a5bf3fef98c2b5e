// Errors raised by the chart widget and its ports
use crate::domain::date_picker::DisabledDate;

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("invalid samples url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("samples request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("samples endpoint answered {status}")]
    Status { status: u16 },

    #[error("invalid samples payload: {0}")]
    Payload(String),

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error(transparent)]
    DisabledDate(#[from] DisabledDate),

    #[error("resource {resource} is not offered for meter {meter}")]
    UnknownResource { meter: String, resource: String },
}

impl WidgetError {
    /// Errors caused by the event itself rather than by a collaborator.
    pub fn is_rejected_event(&self) -> bool {
        matches!(
            self,
            WidgetError::DisabledDate(_) | WidgetError::UnknownResource { .. }
        )
    }
}
