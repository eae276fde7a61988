//! Read-only FAT12 driver.
//!
//! [`Volume`] holds everything loaded from the image (boot sector, first
//! FAT copy, root directory) and never changes after [`Volume::load`], so it
//! can be shared between threads. Reads take the disk as an argument.
//! [`Fat12`] bundles a volume with the disk it was loaded from.

mod bpb;
mod dir;
mod sector;
mod table;
#[cfg(test)]
pub(crate) mod test_image;

pub use bpb::BootSector;
pub use dir::{Attributes, DirectoryEntry, RootDirectory, ShortName};
pub use sector::SectorReader;
pub use table::{FatTable, END_OF_CHAIN};

use crate::disk::{Disk, Info};
use crate::utils::allocate_u8_vector;
use crate::{Error, Result};

/// Index of the first cluster in the data region.
pub const FIRST_DATA_CLUSTER: u16 = 2;

/// Clusters 0xFF7 and up are never data clusters.
pub const MAX_DATA_CLUSTERS: u32 = 0xFF7 - FIRST_DATA_CLUSTER as u32;

#[derive(Debug, Clone)]
pub struct Volume {
    boot_sector: BootSector,
    fat: FatTable,
    root: RootDirectory,
    data_clusters: u32,
}

impl Volume {
    pub fn load(disk: &mut dyn Disk) -> Result<Self> {
        let boot_sector = BootSector::load(disk)?;
        debug!("{}", boot_sector);

        let total_sectors = match boot_sector.total_sectors() {
            0 => (disk.disk_size() / boot_sector.bytes_per_sector as u64) as u32,
            x => x,
        };

        let mut reader = SectorReader::new(disk, boot_sector.bytes_per_sector);
        let fat = FatTable::load(&mut reader, &boot_sector)?;
        let root = RootDirectory::load(&mut reader, &boot_sector)?;

        let total_clusters = total_sectors.saturating_sub(root.end_lba())
            / boot_sector.sectors_per_cluster as u32;
        // a sector count larger than the FAT can describe is capped to the FAT
        let fat_clusters = u32::saturating_sub(fat.num_entries() as u32, FIRST_DATA_CLUSTER as u32);
        let data_clusters = total_clusters.min(fat_clusters).min(MAX_DATA_CLUSTERS);
        debug!(
            "data region starts at LBA {}, {} clusters",
            root.end_lba(),
            data_clusters
        );

        Ok(Self {
            boot_sector,
            fat,
            root,
            data_clusters,
        })
    }

    #[inline]
    pub fn boot_sector(&self) -> &BootSector {
        &self.boot_sector
    }

    #[inline]
    pub fn fat(&self) -> &FatTable {
        &self.fat
    }

    #[inline]
    pub fn root_directory(&self) -> &RootDirectory {
        &self.root
    }

    /// Number of clusters in the data region.
    #[inline]
    pub fn data_clusters(&self) -> u32 {
        self.data_clusters
    }

    /// Cluster size in bytes.
    #[inline]
    pub fn cluster_size(&self) -> usize {
        self.boot_sector.cluster_size()
    }

    pub fn cluster_to_lba(&self, cluster: u16) -> u32 {
        debug_assert!(cluster >= FIRST_DATA_CLUSTER);
        self.root.end_lba()
            + (cluster - FIRST_DATA_CLUSTER) as u32 * self.boot_sector.sectors_per_cluster as u32
    }

    pub fn find_file(&self, name: &[u8; 11]) -> Option<&DirectoryEntry> {
        self.root.find(name)
    }

    /// Minimal output buffer length accepted by [`Volume::read_file`]:
    /// file size rounded up to whole clusters, at least one cluster.
    /// This is never less than the size rounded up to whole sectors.
    pub fn buffer_len(&self, entry: &DirectoryEntry) -> usize {
        let cluster_size = self.cluster_size() as u64;
        let clusters = (entry.size as u64 + cluster_size - 1) / cluster_size;
        (clusters.max(1) * cluster_size) as usize
    }

    pub fn chain(&self, start: u16) -> ClusterChain<'_> {
        let first = FIRST_DATA_CLUSTER as u32;
        ClusterChain {
            fat: &self.fat,
            next: Some(start),
            last_cluster: self.data_clusters.saturating_add(first - 1),
            remaining: self.data_clusters,
        }
    }

    /// Read every cluster of `entry` into consecutive regions of `out`.
    ///
    /// Whole clusters are written, so `out` must hold at least
    /// [`Volume::buffer_len`] bytes. Returns number of bytes written.
    /// A chain which ends before `entry.size` bytes fails with
    /// [`Error::CorruptChain`]. Any failure aborts the read, `out` may then
    /// be partially overwritten.
    pub fn read_file(
        &self,
        disk: &mut dyn Disk,
        entry: &DirectoryEntry,
        out: &mut [u8],
    ) -> Result<usize> {
        let start = entry.first_cluster_low;
        if start == 0 && entry.size == 0 {
            return Ok(0);
        }

        let needed = self.buffer_len(entry);
        if out.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }

        let cluster_size = self.cluster_size();
        let sectors_per_cluster = self.boot_sector.sectors_per_cluster as u32;
        let mut reader = SectorReader::new(disk, self.boot_sector.bytes_per_sector);
        let mut written = 0;
        let mut last = start;

        for cluster in self.chain(start) {
            let cluster = cluster?;
            last = cluster;
            if written + cluster_size > out.len() {
                return Err(Error::CorruptChain {
                    cluster,
                    reason: "chain is longer than the file",
                });
            }

            let lba = self.cluster_to_lba(cluster);
            trace!("cluster {:#05x} at LBA {}", cluster, lba);
            reader.read_sectors(
                lba,
                sectors_per_cluster,
                &mut out[written..written + cluster_size],
            )?;
            written += cluster_size;
        }

        if written < entry.size as usize {
            debug!(
                "chain of {} ended after {} of {} bytes",
                entry.display_name(),
                written,
                entry.size
            );
            return Err(Error::CorruptChain {
                cluster: last,
                reason: "chain is shorter than the file",
            });
        }

        Ok(written)
    }

    /// Read `entry` into a new buffer of exactly `entry.size` bytes.
    pub fn extract(&self, disk: &mut dyn Disk, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        let mut buf = allocate_u8_vector(self.buffer_len(entry))?;
        self.read_file(disk, entry, &mut buf)?;
        buf.truncate(entry.size as usize);
        Ok(buf)
    }
}

/// Iterator over clusters of a chain, starting cluster included.
///
/// Yields an error and stops when the chain links to a reserved cluster,
/// leaves the data region or the FAT, or is longer than the data region
/// (which means it loops).
pub struct ClusterChain<'a> {
    fat: &'a FatTable,
    next: Option<u16>,
    last_cluster: u32,
    remaining: u32,
}

impl<'a> Iterator for ClusterChain<'a> {
    type Item = Result<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        let cluster = self.next.take()?;

        macro_rules! corrupt {
            ($reason:expr) => {
                return Some(Err(Error::CorruptChain {
                    cluster,
                    reason: $reason,
                }))
            };
        }

        if cluster < FIRST_DATA_CLUSTER {
            corrupt!("link to reserved cluster");
        }
        if cluster as u32 > self.last_cluster {
            corrupt!("link past the end of the data region");
        }
        if self.remaining == 0 {
            corrupt!("chain does not terminate");
        }
        self.remaining -= 1;

        match self.fat.entry(cluster) {
            Some(x) if x >= END_OF_CHAIN => (),
            Some(x) => self.next = Some(x),
            None => corrupt!("FAT entry outside of the table"),
        }

        Some(Ok(cluster))
    }
}

/// FAT12 volume together with the disk it was loaded from.
pub struct Fat12<'a> {
    disk: &'a mut dyn Disk,
    volume: Volume,
}

impl<'a> Fat12<'a> {
    pub fn open(disk: &'a mut dyn Disk) -> Result<Self> {
        let volume = Volume::load(disk)?;
        Ok(Self { disk, volume })
    }

    #[inline]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn find_file(&self, name: &[u8; 11]) -> Option<DirectoryEntry> {
        self.volume.find_file(name).copied()
    }

    pub fn read_file(&mut self, entry: &DirectoryEntry, out: &mut [u8]) -> Result<usize> {
        self.volume.read_file(self.disk, entry, out)
    }

    pub fn extract(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>> {
        self.volume.extract(self.disk, entry)
    }

    pub fn extract_by_name(&mut self, name: &[u8; 11]) -> Result<Vec<u8>> {
        let entry = self.find_file(name).ok_or(Error::NotFound)?;
        self.extract(&entry)
    }
}
