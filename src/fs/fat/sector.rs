use crate::disk::{Disk, Info};
use crate::{Error, Result};
use std::io::{self, Read, Seek, SeekFrom};

/// Reads whole sectors addressed by LBA.
pub struct SectorReader<'a> {
    disk: &'a mut dyn Disk,
    bytes_per_sector: u16,
}

impl<'a> SectorReader<'a> {
    pub fn new(disk: &'a mut dyn Disk, bytes_per_sector: u16) -> Self {
        debug_assert!(bytes_per_sector != 0);
        Self {
            disk,
            bytes_per_sector,
        }
    }

    /// Read `count` sectors starting at `lba` into the beginning of `out`.
    /// On error contents of `out` are unspecified.
    pub fn read_sectors(&mut self, lba: u32, count: u32, out: &mut [u8]) -> Result<()> {
        let length = count as usize * self.bytes_per_sector as usize;
        if out.len() < length {
            return Err(Error::BufferTooSmall {
                needed: length,
                available: out.len(),
            });
        }

        let offset = lba as u64 * self.bytes_per_sector as u64;
        if offset > self.disk.disk_size() {
            return Err(Error::IoSeekFailure { lba });
        }

        self.disk.seek(SeekFrom::Start(offset)).map_err(|e| {
            debug!("seek to {} failed: {}", offset, e);
            Error::IoSeekFailure { lba }
        })?;
        self.disk
            .read_exact(&mut out[..length])
            .map_err(|e| match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::IoShortRead { lba, count },
                _ => Error::IoError(e),
            })
    }
}
