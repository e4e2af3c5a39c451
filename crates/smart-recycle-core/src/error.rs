use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize slot: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Malformed content in slot '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Maximum length of slot content quoted in log messages
const MAX_LOGGED_CONTENT_LENGTH: usize = 200;

impl StoreError {
    pub fn deserialization(key: &str, source: serde_json::Error) -> Self {
        StoreError::Deserialization {
            key: key.to_string(),
            source,
        }
    }

    /// Truncate slot content to avoid logging whole collections
    pub fn truncate_content(content: &str) -> String {
        if content.len() <= MAX_LOGGED_CONTENT_LENGTH {
            content.to_string()
        } else {
            let head: String = content.chars().take(MAX_LOGGED_CONTENT_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, content.len())
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
