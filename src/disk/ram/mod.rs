use crate::disk::{Disk, Info};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

/// In-memory disk image.
pub struct RamDisk {
    buffer: Cursor<Vec<u8>>,
}

impl RamDisk {
    pub fn new_zeroed(size_in_bytes: usize) -> Self {
        Self {
            buffer: Cursor::new(vec![0u8; size_in_bytes]),
        }
    }

    pub fn from_vec(vector: Vec<u8>) -> Self {
        Self {
            buffer: Cursor::new(vector),
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

impl Read for RamDisk {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Seek for RamDisk {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer.seek(pos)
    }
}

// Only used to lay out images; the filesystem code never writes.
impl Write for RamDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush()
    }
}

impl Info for RamDisk {
    fn disk_size(&self) -> u64 {
        self.buffer.get_ref().len() as u64
    }
}

impl Disk for RamDisk {}
