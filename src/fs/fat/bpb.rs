use crate::disk::Disk;
use crate::utils::div_round_up;
use crate::{is_power_of_2, Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use super::dir::DirectoryEntry;

/// BIOS parameter block and extended boot record of a FAT12 volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSector {
    pub jump: [u8; 3],
    pub oem_id: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub dir_entry_count: u16,
    pub sectors_total: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub number_of_heads: u16,
    pub hidden_sectors: u32,
    pub large_sector_count: u32,
    pub drive_number: u8,
    pub signature: u8,
    pub volume_id: u32,
    pub volume_label: [u8; 11],
    pub system_id: [u8; 8],
}

impl BootSector {
    /// Size of the decoded region, boot code is not part of it.
    pub const SIZE: usize = 62;

    pub fn load(disk: &mut dyn Disk) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];

        disk.seek(SeekFrom::Start(0))?;
        disk.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::MalformedBootSector(format!(
                "image is shorter than {} bytes",
                Self::SIZE
            )),
            _ => Error::IoError(e),
        })?;

        Self::decode(&buf)
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::MalformedBootSector(format!(
                "got {} bytes, expected {}",
                buf.len(),
                Self::SIZE
            )));
        }

        let mut reader = Cursor::new(&buf[..Self::SIZE]);

        macro_rules! read {
            (array($size:expr)) => {{
                let mut a = [0u8; $size];
                reader.read_exact(&mut a)?;
                a
            }};
            (u8) => {
                reader.read_u8()?
            };
            (u16) => {
                reader.read_u16::<LittleEndian>()?
            };
            (u32) => {
                reader.read_u32::<LittleEndian>()?
            };
        }

        let jump = read!(array(3));
        let oem_id = read!(array(8));
        let bytes_per_sector = read!(u16);
        let sectors_per_cluster = read!(u8);
        let reserved_sectors = read!(u16);
        let fat_count = read!(u8);
        let dir_entry_count = read!(u16);
        let sectors_total = read!(u16);
        let media_descriptor = read!(u8);
        let sectors_per_fat = read!(u16);
        let sectors_per_track = read!(u16);
        let number_of_heads = read!(u16);
        let hidden_sectors = read!(u32);
        let large_sector_count = read!(u32);
        let drive_number = read!(u8);
        let _ = read!(u8);
        let signature = read!(u8);
        let volume_id = read!(u32);
        let volume_label = read!(array(11));
        let system_id = read!(array(8));

        debug_assert_eq!(reader.position(), Self::SIZE as u64);

        if bytes_per_sector == 0 {
            return Err(Error::MalformedBootSector(
                "bytes per sector is zero".to_owned(),
            ));
        }
        if sectors_per_cluster == 0 {
            return Err(Error::MalformedBootSector(
                "sectors per cluster is zero".to_owned(),
            ));
        }
        if !is_power_of_2!(bytes_per_sector) {
            warn!("bytes per sector ({}) is not a power of 2", bytes_per_sector);
        }

        Ok(Self {
            jump,
            oem_id,
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            fat_count,
            dir_entry_count,
            sectors_total,
            media_descriptor,
            sectors_per_fat,
            sectors_per_track,
            number_of_heads,
            hidden_sectors,
            large_sector_count,
            drive_number,
            signature,
            volume_id,
            volume_label,
            system_id,
        })
    }

    pub fn total_sectors(&self) -> u32 {
        if self.sectors_total == 0 {
            self.large_sector_count
        } else {
            self.sectors_total as u32
        }
    }

    #[inline]
    pub fn fat_lba(&self) -> u32 {
        self.reserved_sectors as u32
    }

    #[inline]
    pub fn fat_size(&self) -> usize {
        self.sectors_per_fat as usize * self.bytes_per_sector as usize
    }

    #[inline]
    pub fn root_directory_lba(&self) -> u32 {
        self.reserved_sectors as u32 + self.sectors_per_fat as u32 * self.fat_count as u32
    }

    /// Root directory size in sectors, the last sector may be partially used.
    #[inline]
    pub fn root_directory_sectors(&self) -> u32 {
        div_round_up(
            DirectoryEntry::SIZE as u32 * self.dir_entry_count as u32,
            self.bytes_per_sector as u32,
        )
    }

    /// First LBA of the data region.
    #[inline]
    pub fn root_directory_end(&self) -> u32 {
        self.root_directory_lba() + self.root_directory_sectors()
    }

    #[inline]
    pub fn cluster_size(&self) -> usize {
        self.sectors_per_cluster as usize * self.bytes_per_sector as usize
    }
}

impl fmt::Display for BootSector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Oem ID                      : {}
Bytes per sector            : {}
Sectors per cluster         : {}
Reserved sectors            : {}
Number of FATs              : {}
Number of directory entries : {}
Total sectors               : {}
Media descriptor            : {:#04x}
Sectors per FAT             : {}
Sectors per track           : {}
Number of heads             : {}
Number of hidden sectors    : {}
Volume ID                   : {:08X}
Label                       : {}
System ID                   : {}",
            String::from_utf8_lossy(&self.oem_id),
            self.bytes_per_sector,
            self.sectors_per_cluster,
            self.reserved_sectors,
            self.fat_count,
            self.dir_entry_count,
            self.total_sectors(),
            self.media_descriptor,
            self.sectors_per_fat,
            self.sectors_per_track,
            self.number_of_heads,
            self.hidden_sectors,
            self.volume_id,
            String::from_utf8_lossy(&self.volume_label).trim_end(),
            String::from_utf8_lossy(&self.system_id).trim_end(),
        )
    }
}
