use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("combat log is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("uploader_id is required")]
    MissingUploader,

    #[error("no combat events found in the log")]
    NoEvents,

    #[error("failed to encode upload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to publish upload: {0}")]
    Publish(String),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::MissingUploader => StatusCode::BAD_REQUEST,
            UploadError::NoEvents => StatusCode::UNPROCESSABLE_ENTITY,
            UploadError::Encode(_) | UploadError::Publish(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for (StatusCode, String) {
    fn from(err: UploadError) -> Self {
        (err.status(), err.to_string())
    }
}
