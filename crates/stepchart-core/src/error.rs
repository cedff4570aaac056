use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No BPM found for {id}")]
    MissingBpm { id: String },

    #[error("Failed to find a value for dwi note '{ch}' in {id} (near \"{fragment}\")")]
    UnknownArrowChar {
        id: String,
        ch: char,
        fragment: String,
    },

    #[error("No chart with {feet} feet matches the difficulty priority list")]
    NoMatchingDifficulty { feet: u32 },

    #[error("No playable single/double chart found in {id}")]
    NoPlayableChart { id: String },

    #[error("Malformed #{tag} tag in {id}: \"{value}\"")]
    MalformedTag {
        id: String,
        tag: String,
        value: String,
    },

    #[error("Malformed note line in {id}: \"{line}\"")]
    MalformedNoteLine { id: String, line: String },

    #[error("Song has no charts to choose from")]
    NoCharts,

    #[error("Chart data missing for {0}")]
    MissingChart(String),

    #[error("Unsupported chart format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed_tag(id: &str, tag: &str, value: &str) -> Self {
        Error::MalformedTag {
            id: id.to_string(),
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }

    /// True for errors raised while reading chart text, as opposed to
    /// selection or I/O failures.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::MissingBpm { .. }
                | Self::UnknownArrowChar { .. }
                | Self::NoPlayableChart { .. }
                | Self::MalformedTag { .. }
                | Self::MalformedNoteLine { .. }
        )
    }
}
