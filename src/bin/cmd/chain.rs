use crate::{
    utils::{open_disk, parse_name},
    CommonDiskOptions,
};
use anyhow::Context;
use clap::Parser;
use fat12util::fs::fat::Volume;
use fat12util::Error;

#[derive(Parser)]
#[clap(about = "Print the cluster chain of a file")]
pub struct Command {
    #[clap(flatten)]
    pub disk: CommonDiskOptions,

    #[clap(help = "File name, e.g. KERNEL.BIN")]
    pub name: String,

    #[clap(long, help = "Match the name byte for byte, space padded to 11 bytes")]
    pub raw_name: bool,
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let name = parse_name(&command.name, command.raw_name)?;

    let mut disk = open_disk(&command.disk.file)?;
    let volume = Volume::load(&mut disk).context("failed to load filesystem")?;
    let entry = volume
        .find_file(name.as_bytes())
        .ok_or(Error::NotFound)
        .with_context(|| format!("could not find file {}", command.name))?;

    if entry.first_cluster_low == 0 && entry.size == 0 {
        println!("{} is empty", entry.display_name());
        return Ok(());
    }

    for cluster in volume.chain(entry.first_cluster_low) {
        let cluster = cluster.context("failed to follow cluster chain")?;
        println!("{:#05x} -> LBA {}", cluster, volume.cluster_to_lba(cluster));
    }

    Ok(())
}
