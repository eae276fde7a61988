//! In-memory FAT12 image builder used by tests.

use super::dir::Attributes;
use crate::disk::ram::RamDisk;

#[derive(Debug, Copy, Clone)]
pub struct Geometry {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fat_count: u8,
    pub root_entries: u16,
    pub sectors_per_fat: u16,
    pub total_sectors: u16,
}

impl Geometry {
    pub const FLOPPY_1440: Geometry = Geometry {
        bytes_per_sector: 512,
        sectors_per_cluster: 1,
        reserved_sectors: 1,
        fat_count: 2,
        root_entries: 224,
        sectors_per_fat: 9,
        total_sectors: 2880,
    };

    fn bps(&self) -> usize {
        self.bytes_per_sector as usize
    }

    pub fn root_directory_lba(&self) -> usize {
        self.reserved_sectors as usize + self.sectors_per_fat as usize * self.fat_count as usize
    }

    pub fn root_directory_end(&self) -> usize {
        let bytes = self.root_entries as usize * 32;
        self.root_directory_lba() + (bytes + self.bps() - 1) / self.bps()
    }

    pub fn cluster_size(&self) -> usize {
        self.sectors_per_cluster as usize * self.bps()
    }
}

pub fn encode_fat12_entry(fat: &mut [u8], cluster: u16, value: u16) {
    let offset = cluster as usize * 3 / 2;
    let value = value & 0x0FFF;

    if cluster % 2 == 0 {
        fat[offset] = value as u8;
        fat[offset + 1] = (fat[offset + 1] & 0xF0) | (value >> 8) as u8;
    } else {
        fat[offset] = (fat[offset] & 0x0F) | ((value & 0x0F) << 4) as u8;
        fat[offset + 1] = (value >> 4) as u8;
    }
}

pub struct ImageBuilder {
    geometry: Geometry,
    image: Vec<u8>,
    next_slot: usize,
}

impl ImageBuilder {
    pub fn new(geometry: Geometry) -> Self {
        let mut image = vec![0u8; geometry.total_sectors as usize * geometry.bps()];

        let bs = &mut image[..62];
        bs[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        bs[3..11].copy_from_slice(b"MSWIN4.1");
        bs[11..13].copy_from_slice(&geometry.bytes_per_sector.to_le_bytes());
        bs[13] = geometry.sectors_per_cluster;
        bs[14..16].copy_from_slice(&geometry.reserved_sectors.to_le_bytes());
        bs[16] = geometry.fat_count;
        bs[17..19].copy_from_slice(&geometry.root_entries.to_le_bytes());
        bs[19..21].copy_from_slice(&geometry.total_sectors.to_le_bytes());
        bs[21] = 0xF0;
        bs[22..24].copy_from_slice(&geometry.sectors_per_fat.to_le_bytes());
        bs[24..26].copy_from_slice(&18u16.to_le_bytes());
        bs[26..28].copy_from_slice(&2u16.to_le_bytes());
        bs[36] = 0x00;
        bs[38] = 0x29;
        bs[39..43].copy_from_slice(&0x1234_ABCDu32.to_le_bytes());
        bs[43..54].copy_from_slice(b"NO NAME    ");
        bs[54..62].copy_from_slice(b"FAT12   ");
        if image.len() >= 512 {
            image[510] = 0x55;
            image[511] = 0xAA;
        }

        let mut builder = Self {
            geometry,
            image,
            next_slot: 0,
        };
        if geometry.sectors_per_fat > 0 {
            builder.set_fat(0, 0xFF0);
            builder.set_fat(1, 0xFFF);
        }
        builder
    }

    /// Write `value` into entry `cluster` of every FAT copy.
    pub fn set_fat(&mut self, cluster: u16, value: u16) {
        let g = self.geometry;
        let fat_size = g.sectors_per_fat as usize * g.bps();
        for i in 0..g.fat_count as usize {
            let start = (g.reserved_sectors as usize + i * g.sectors_per_fat as usize) * g.bps();
            encode_fat12_entry(&mut self.image[start..start + fat_size], cluster, value);
        }
    }

    pub fn add_entry(&mut self, name: &[u8; 11], attributes: Attributes, cluster: u16, size: u32) {
        assert!(self.next_slot < self.geometry.root_entries as usize);

        let offset = self.geometry.root_directory_lba() * self.geometry.bps() + self.next_slot * 32;
        let e = &mut self.image[offset..offset + 32];
        e[..11].copy_from_slice(name);
        e[0x0B] = attributes.bits();
        // 2021-03-14 12:34:48
        e[0x16..0x18].copy_from_slice(&0x6458u16.to_le_bytes());
        e[0x18..0x1A].copy_from_slice(&0x526Eu16.to_le_bytes());
        e[0x1A..0x1C].copy_from_slice(&cluster.to_le_bytes());
        e[0x1C..0x20].copy_from_slice(&size.to_le_bytes());

        self.next_slot += 1;
    }

    pub fn cluster_offset(&self, cluster: u16) -> usize {
        let g = &self.geometry;
        (g.root_directory_end() + (cluster as usize - 2) * g.sectors_per_cluster as usize) * g.bps()
    }

    pub fn write_cluster(&mut self, cluster: u16, data: &[u8]) {
        assert!(data.len() <= self.geometry.cluster_size());
        let offset = self.cluster_offset(cluster);
        self.image[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Lay out `data` over `clusters`, link them and add a directory entry.
    pub fn add_file(&mut self, name: &[u8; 11], clusters: &[u16], data: &[u8]) {
        let cluster_size = self.geometry.cluster_size();
        assert!(data.len() <= clusters.len() * cluster_size);

        for (i, &cluster) in clusters.iter().enumerate() {
            let next = clusters.get(i + 1).copied().unwrap_or(0xFFF);
            self.set_fat(cluster, next);

            let start = i * cluster_size;
            if start < data.len() {
                let end = std::cmp::min(start + cluster_size, data.len());
                self.write_cluster(cluster, &data[start..end]);
            }
        }

        let first = clusters.first().copied().unwrap_or(0);
        self.add_entry(name, Attributes::ARCHIVE, first, data.len() as u32);
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.image
    }

    pub fn build(self) -> RamDisk {
        RamDisk::from_vec(self.image)
    }
}

/// Deterministic, non-repeating test payload.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| {
            (i as u32)
                .wrapping_mul(31)
                .wrapping_add(seed as u32 * 7 + (i / 251) as u32) as u8
        })
        .collect()
}
