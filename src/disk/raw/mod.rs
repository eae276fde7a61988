use crate::disk::{Disk, Info};
use std::io::{self, Read, Seek, SeekFrom};

/// Disk image backed by any seekable stream, e.g. a file or a block device.
pub struct RawDisk<B>
where
    B: Read + Seek,
{
    backend: B,
    disk_size: u64,
}

impl<B> RawDisk<B>
where
    B: Read + Seek,
{
    pub fn open(mut backend: B) -> io::Result<Self> {
        let disk_size = backend.seek(SeekFrom::End(0))?;
        backend.seek(SeekFrom::Start(0))?;

        Ok(Self { backend, disk_size })
    }
}

impl<B> Read for RawDisk<B>
where
    B: Read + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.backend.read(buf)
    }
}

impl<B> Seek for RawDisk<B>
where
    B: Read + Seek,
{
    fn seek(&mut self, seek: SeekFrom) -> io::Result<u64> {
        self.backend.seek(seek)
    }
}

impl<B> Info for RawDisk<B>
where
    B: Read + Seek,
{
    fn disk_size(&self) -> u64 {
        self.disk_size
    }
}

impl<B> Disk for RawDisk<B> where B: Read + Seek {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_raw_disk_size() {
        crate::tests_init();

        let mut disk = RawDisk::open(Cursor::new(vec![7u8; 1536])).unwrap();
        assert_eq!(disk.disk_size(), 1536);

        // open must rewind the backend
        let mut b = [0u8; 4];
        disk.read_exact(&mut b).unwrap();
        assert_eq!(b, [7, 7, 7, 7]);
        assert_eq!(disk.seek(SeekFrom::Current(0)).unwrap(), 4);
    }
}
