use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("unknown grouping '{0}' (expected status, user or priority)")]
    UnknownGroupKey(String),
    #[error("unknown ordering '{0}' (expected priority or title)")]
    UnknownOrderKey(String),
}
