use crate::{
    utils::{open_disk, size_to_string},
    CommonDiskOptions,
};
use anyhow::Context;
use clap::Parser;
use fat12util::fs::fat::Volume;

#[derive(Parser)]
#[clap(about = "Show boot sector and volume geometry")]
pub struct Command {
    #[clap(flatten)]
    pub disk: CommonDiskOptions,
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let mut disk = open_disk(&command.disk.file)?;
    let volume = Volume::load(&mut disk).context("failed to load filesystem")?;
    let bpb = volume.boot_sector();

    println!("{}", bpb);
    println!(
        "FAT LBA                     : {}
Root directory LBA          : {}
Data region LBA             : {}
Cluster size                : {}
Data clusters               : {}
Data region size            : {}",
        bpb.fat_lba(),
        volume.root_directory().lba(),
        volume.root_directory().end_lba(),
        volume.cluster_size(),
        volume.data_clusters(),
        size_to_string(volume.data_clusters() as u64 * volume.cluster_size() as u64)
    );

    Ok(())
}
