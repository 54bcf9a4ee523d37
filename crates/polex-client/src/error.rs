use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Not authenticated: acquire a token before fetching")]
    NotAuthenticated,

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rule query for policy '{0}' returned no policy object")]
    EmptyRuleResponse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
