use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("VB365_PASSWORD environment variable not set")]
    MissingPassword,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Error getting {what}: {message}")]
    Fetch { what: String, message: String },

    #[error("Error updating job '{job_name}' ({job_id}) for item {veeam_item_id}: {message}")]
    Mutation {
        job_id: String,
        job_name: String,
        veeam_item_id: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn fetch(what: impl Into<String>, message: impl ToString) -> Self {
        Error::Fetch {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// True for problems detected before any backend call is made.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::InvalidConfig(_) | Error::MissingPassword
        )
    }
}
