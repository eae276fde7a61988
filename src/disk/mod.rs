pub mod ram;
pub mod raw;

use std::io;

pub trait Info {
    /// Size of the backing store in bytes.
    fn disk_size(&self) -> u64;
}

/// Read-only, randomly addressable disk image.
pub trait Disk: io::Read + io::Seek + Info {}
