use std::{io, result};

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error("malformed boot sector: {0}")]
    MalformedBootSector(String),
    #[error("short read of {count} sector(s) at LBA {lba}")]
    IoShortRead { lba: u32, count: u32 },
    #[error("cannot seek to LBA {lba}")]
    IoSeekFailure { lba: u32 },
    #[error("not found")]
    NotFound,
    #[error("failed to allocate {0} bytes")]
    AllocationFailure(usize),
    #[error("corrupt cluster chain at cluster {cluster:#05x}: {reason}")]
    CorruptChain { cluster: u16, reason: &'static str },
    #[error("buffer too small ({available} bytes, need {needed})")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("invalid 8.3 name {0:?}")]
    InvalidName(String),
}
