//! Failure kinds for the collaborators around the advice engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Invalid phrase bank: {0}")]
    PhraseBank(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AdvisorError {
    /// Short message suitable for showing inline to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::LocationNotFound(loc) => format!("Couldn't find \"{loc}\". Try another place."),
            Self::ProviderUnavailable(_) | Self::Http(_) => {
                "Could not fetch weather data".to_string()
            }
            Self::PermissionDenied => "Permission to access location was denied".to_string(),
            Self::Persistence(_) => "Could not update your saved items".to_string(),
            Self::PhraseBank(msg) => format!("Phrase bank is misconfigured: {msg}"),
        }
    }

    /// Whether the caller can carry on with a fallback (default location,
    /// raw condition text, in-memory state).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::PhraseBank(_))
    }
}

impl From<std::io::Error> for AdvisorError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
