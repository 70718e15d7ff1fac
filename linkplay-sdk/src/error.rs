use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    ApiError(#[from] linkplay_api::ApiError),

    #[error("Discovery error: {0}")]
    DiscoveryError(#[from] linkplay_discovery::DiscoveryError),

    #[error("Speaker not found: {0}")]
    SpeakerNotFound(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),
}
