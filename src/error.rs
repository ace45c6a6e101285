use thiserror::Error;

/// Fatal errors raised while resolving sources or building URLs.
///
/// A provider that cannot produce a URL because an external collaborator is
/// missing does not error; it returns `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum ImgixerError {
    #[error("the `{0}` source is not defined in your config")]
    UnknownSource(String),

    #[error("no sources are defined in your config")]
    NoSources,

    #[error("the {provider} provider must be passed an asset, not a path")]
    InvalidAssetType { provider: &'static str },

    #[error("the `{0}` keys are not defined in your config")]
    MissingCredentials(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}
