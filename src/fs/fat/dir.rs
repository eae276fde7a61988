use super::bpb::BootSector;
use super::sector::SectorReader;
use crate::utils::allocate_u8_vector;
use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

bitflags! {
    pub struct Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN = 0x02;
        const SYSTEM = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE = 0x20;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: [u8; 11],
    pub attributes: Attributes,
    pub created_time_tenths: u8,
    pub created_time: u16,
    pub created_date: u16,
    pub accessed_date: u16,
    pub first_cluster_high: u16,
    pub modified_time: u16,
    pub modified_date: u16,
    pub first_cluster_low: u16,
    pub size: u32,
}

impl DirectoryEntry {
    pub const SIZE: usize = 32;
    pub const FREE_MARKER: u8 = 0x00;
    pub const DELETED_MARKER: u8 = 0xE5;

    /// Decode a 32 byte directory record.
    pub fn decode(buf: &[u8; DirectoryEntry::SIZE]) -> Self {
        let mut name = [0u8; 11];
        name.copy_from_slice(&buf[0x00..0x0B]);

        Self {
            name,
            attributes: Attributes::from_bits_truncate(buf[0x0B]),
            created_time_tenths: buf[0x0D],
            created_time: LittleEndian::read_u16(&buf[0x0E..]),
            created_date: LittleEndian::read_u16(&buf[0x10..]),
            accessed_date: LittleEndian::read_u16(&buf[0x12..]),
            first_cluster_high: LittleEndian::read_u16(&buf[0x14..]),
            modified_time: LittleEndian::read_u16(&buf[0x16..]),
            modified_date: LittleEndian::read_u16(&buf[0x18..]),
            first_cluster_low: LittleEndian::read_u16(&buf[0x1A..]),
            size: LittleEndian::read_u32(&buf[0x1C..]),
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.name[0] == Self::FREE_MARKER
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.name[0] == Self::DELETED_MARKER
    }

    #[inline]
    pub fn is_volume_label(&self) -> bool {
        self.attributes.contains(Attributes::VOLUME_ID)
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.attributes.contains(Attributes::DIRECTORY)
    }

    /// Name in `NAME.EXT` form with padding removed.
    pub fn display_name(&self) -> String {
        let base = String::from_utf8_lossy(&self.name[..8]);
        let ext = String::from_utf8_lossy(&self.name[8..]);
        let base = base.trim_end_matches(' ');
        let ext = ext.trim_end_matches(' ');

        if ext.is_empty() {
            base.to_owned()
        } else {
            format!("{}.{}", base, ext)
        }
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        let date = decode_date(self.created_date)?;
        let t = self.created_time;
        // tenths field holds 10 ms units, up to 1.99 s
        let millis = (t & 0x1F) as u32 * 2000 + self.created_time_tenths as u32 * 10;
        let time = NaiveTime::from_hms_milli_opt(
            (t >> 11) as u32,
            ((t >> 5) & 0x3F) as u32,
            millis / 1000,
            millis % 1000,
        )?;
        Some(date.and_time(time))
    }

    pub fn modified(&self) -> Option<NaiveDateTime> {
        Some(decode_date(self.modified_date)?.and_time(decode_time(self.modified_time)?))
    }

    pub fn accessed(&self) -> Option<NaiveDate> {
        decode_date(self.accessed_date)
    }
}

fn decode_date(x: u16) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        1980 + (x >> 9) as i32,
        ((x >> 5) & 0x0F) as u32,
        (x & 0x1F) as u32,
    )
}

fn decode_time(x: u16) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(
        (x >> 11) as u32,
        ((x >> 5) & 0x3F) as u32,
        (x & 0x1F) as u32 * 2,
    )
}

/// Space padded 8.3 name as stored in directory records.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShortName([u8; 11]);

impl ShortName {
    const INVALID_CHARS: &'static [u8] = b"\"*+,./:;<=>?[\\]| ";

    /// Convert `name.ext` into its on-disk form, upper-casing it.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidName(s.to_owned());

        if !s.is_ascii() {
            return Err(invalid());
        }

        let mut parts = s.splitn(2, '.');
        let base = parts.next().unwrap_or("");
        let ext = parts.next().unwrap_or("");

        if base.is_empty() || base.len() > 8 || ext.len() > 3 {
            return Err(invalid());
        }

        let mut name = [b' '; 11];
        for (i, c) in base.bytes().enumerate() {
            if c < 0x20 || Self::INVALID_CHARS.contains(&c) {
                return Err(invalid());
            }
            name[i] = c.to_ascii_uppercase();
        }
        for (i, c) in ext.bytes().enumerate() {
            if c < 0x20 || Self::INVALID_CHARS.contains(&c) {
                return Err(invalid());
            }
            name[8 + i] = c.to_ascii_uppercase();
        }

        Ok(Self(name))
    }

    /// Use `raw` verbatim, padding with spaces up to 11 bytes.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() > 11 {
            return Err(Error::InvalidName(
                String::from_utf8_lossy(raw).into_owned(),
            ));
        }

        let mut name = [b' '; 11];
        name[..raw.len()].copy_from_slice(raw);
        Ok(Self(name))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 11] {
        &self.0
    }
}

impl FromStr for ShortName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Fixed size root directory region of a FAT12 volume.
#[derive(Debug, Clone)]
pub struct RootDirectory {
    entries: Vec<DirectoryEntry>,
    lba: u32,
    end_lba: u32,
}

impl RootDirectory {
    pub fn load(reader: &mut SectorReader, bpb: &BootSector) -> Result<Self> {
        let lba = bpb.root_directory_lba();
        let sectors = bpb.root_directory_sectors();

        let mut buf =
            allocate_u8_vector(sectors as usize * bpb.bytes_per_sector as usize)?;
        reader.read_sectors(lba, sectors, &mut buf)?;

        let entries = buf
            .chunks_exact(DirectoryEntry::SIZE)
            .take(bpb.dir_entry_count as usize)
            .filter_map(|chunk| chunk.try_into().ok().map(DirectoryEntry::decode))
            .collect::<Vec<_>>();
        debug_assert_eq!(entries.len(), bpb.dir_entry_count as usize);

        let end_lba = lba + sectors;
        debug!(
            "loaded root directory: LBA {}-{}, {} entries",
            lba,
            end_lba,
            entries.len()
        );

        Ok(Self {
            entries,
            lba,
            end_lba,
        })
    }

    #[inline]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[inline]
    pub fn lba(&self) -> u32 {
        self.lba
    }

    /// LBA right after the directory, where the data region begins.
    #[inline]
    pub fn end_lba(&self) -> u32 {
        self.end_lba
    }

    /// Scan every slot, free and deleted ones included. First exact match wins.
    pub fn find(&self, name: &[u8; 11]) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| &e.name == name)
    }
}
