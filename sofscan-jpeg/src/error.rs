#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid start of image marker: {0:x?}")]
    InvalidSoi(Vec<u8>),
    #[error("Truncated read of {width} bytes at position {position:#x}")]
    TruncatedRead { position: usize, width: usize },
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}
