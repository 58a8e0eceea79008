/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type. Upstream API
/// outcomes are not errors at this level; see [`crate::api::ApiFailure`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
