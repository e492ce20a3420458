use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Construction-time failures. Nothing on the running terminal path returns
/// an error: dropped bytes and unknown sequences are silent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("tile index {0} out of range (0-9)")]
    InvalidTile(u8),
    #[error("cell ({col}, {row}) is off the 40x8 grid")]
    InvalidCell { col: u8, row: u8 },
    #[error("baud rate {0} cannot be generated from the cpu clock")]
    UnreachableBaud(u32),
}
