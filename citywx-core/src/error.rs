use thiserror::Error;

/// Why a single lookup did not produce a snapshot.
///
/// `Display` carries the technical detail for logs; [`FetchError::user_message`]
/// is what the user gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service answered with a "city not found" status.
    #[error("city not found")]
    NotFound,

    /// The service answered with a status other than OK or not-found.
    #[error("unexpected status from weather service: {0}")]
    BadStatus(String),

    /// The request could not be completed or its body could not be decoded.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotFound => "City not found. Please try again.",
            FetchError::BadStatus(_) => "Failed to fetch data. Please check your connection.",
            FetchError::Transport(_) => "An error occurred while fetching the weather data.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Transport(format!("request timed out: {err}"))
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}
