use thiserror::Error;

/// Errors surfaced by the emulator facade and its loaders.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("cart RAM size mismatch: expected {expected} bytes, got {actual}")]
    RamSizeMismatch { expected: usize, actual: usize },
    #[error("ROM image too small for a cartridge header ({0} bytes)")]
    RomTooSmall(usize),
    #[error("no state serializer installed")]
    NoSerializer,
    #[error("snapshot rejected: {0}")]
    Snapshot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
