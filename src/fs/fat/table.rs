use super::bpb::BootSector;
use super::sector::SectorReader;
use crate::utils::allocate_u8_vector;
use crate::Result;
use byteorder::{ByteOrder, LittleEndian};

/// Lowest value marking the end of a cluster chain.
pub const END_OF_CHAIN: u16 = 0x0FF8;

/// First copy of the File Allocation Table, kept in its packed on-disk form.
/// Two 12-bit entries share three bytes.
#[derive(Debug, Clone)]
pub struct FatTable {
    bytes: Vec<u8>,
}

impl FatTable {
    pub fn load(reader: &mut SectorReader, bpb: &BootSector) -> Result<Self> {
        let mut bytes = allocate_u8_vector(bpb.fat_size())?;
        // mirrors are not compared with the first copy
        reader.read_sectors(bpb.fat_lba(), bpb.sectors_per_fat as u32, &mut bytes)?;
        debug!(
            "loaded FAT: LBA {}, {} sectors ({} bytes)",
            bpb.fat_lba(),
            bpb.sectors_per_fat,
            bytes.len()
        );

        Ok(Self { bytes })
    }

    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of entries which fit completely in the table.
    pub fn num_entries(&self) -> usize {
        self.bytes.len() * 2 / 3
    }

    /// Decode entry for `cluster`, `None` if it lies outside the table.
    pub fn entry(&self, cluster: u16) -> Option<u16> {
        let offset = cluster as usize * 3 / 2;
        if offset + 1 >= self.bytes.len() {
            return None;
        }

        let word = LittleEndian::read_u16(&self.bytes[offset..offset + 2]);
        Some(if cluster % 2 == 0 {
            word & 0x0FFF
        } else {
            word >> 4
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::fat::test_image::encode_fat12_entry;

    #[test]
    fn test_decode_known_bytes() {
        crate::tests_init();

        // F0 FF FF | 03 40 00 | FF 0F 00
        let fat = FatTable::from_vec(vec![
            0xF0, 0xFF, 0xFF, 0x03, 0x40, 0x00, 0xFF, 0x0F, 0x00,
        ]);

        assert_eq!(fat.entry(0), Some(0xFF0));
        assert_eq!(fat.entry(1), Some(0xFFF));
        assert_eq!(fat.entry(2), Some(0x003));
        assert_eq!(fat.entry(3), Some(0x004));
        assert_eq!(fat.entry(4), Some(0xFFF));
        assert_eq!(fat.entry(5), Some(0x000));
        assert_eq!(fat.num_entries(), 6);
    }

    #[test]
    fn test_encode_decode_sequence() {
        crate::tests_init();

        let links: Vec<u16> = vec![
            0xFF0, 0xFFF, 0x003, 0x009, 0xABC, 0x123, 0xFF8, 0x000, 0x800, 0x00F, 0xF00, 0xFFF,
            0x555, 0xAAA,
        ];

        let mut bytes = vec![0u8; links.len() * 3 / 2 + 1];
        for (i, &v) in links.iter().enumerate() {
            encode_fat12_entry(&mut bytes, i as u16, v);
        }

        let fat = FatTable::from_vec(bytes);
        for (i, &v) in links.iter().enumerate() {
            assert_eq!(fat.entry(i as u16), Some(v), "entry {}", i);
        }
    }

    #[test]
    fn test_neighbours_are_not_clobbered() {
        crate::tests_init();

        let mut bytes = vec![0u8; 12];
        encode_fat12_entry(&mut bytes, 4, 0xFFF);
        encode_fat12_entry(&mut bytes, 6, 0xFFF);
        encode_fat12_entry(&mut bytes, 5, 0x000);

        let fat = FatTable::from_vec(bytes);
        assert_eq!(fat.entry(4), Some(0xFFF));
        assert_eq!(fat.entry(5), Some(0x000));
        assert_eq!(fat.entry(6), Some(0xFFF));
        assert_eq!(fat.entry(3), Some(0x000));
        assert_eq!(fat.entry(7), Some(0x000));
    }

    #[test]
    fn test_entry_out_of_table() {
        crate::tests_init();

        let fat = FatTable::from_vec(vec![0u8; 6]);
        assert_eq!(fat.num_entries(), 4);
        assert!(fat.entry(3).is_some());
        assert!(fat.entry(4).is_none());
        assert!(fat.entry(0xFFF).is_none());

        let fat = FatTable::from_vec(Vec::new());
        assert!(fat.entry(0).is_none());
    }
}
