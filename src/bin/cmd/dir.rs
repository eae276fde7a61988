use crate::{
    utils::{open_disk, size_to_string},
    CommonDiskOptions,
};
use anyhow::Context;
use clap::Parser;
use fat12util::fs::fat::{DirectoryEntry, Volume};

#[derive(Parser)]
#[clap(about = "List the root directory")]
pub struct Command {
    #[clap(flatten)]
    pub disk: CommonDiskOptions,

    #[clap(short, long, help = "Include free, deleted and volume label slots")]
    pub all: bool,
}

fn format_entry(e: &DirectoryEntry) -> String {
    let modified = e
        .modified()
        .map(|t| t.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| " ".repeat(16));

    format!(
        "{} {} {:>10} {:>5} {}",
        modified,
        if e.is_dir() { "<DIR>" } else { "     " },
        e.size,
        e.first_cluster_low,
        e.display_name()
    )
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let mut disk = open_disk(&command.disk.file)?;
    let volume = Volume::load(&mut disk).context("failed to load filesystem")?;

    let mut files = 0;
    let mut bytes = 0u64;
    for e in volume.root_directory().entries() {
        if !command.all && (e.is_free() || e.is_deleted() || e.is_volume_label()) {
            continue;
        }

        println!("{}", format_entry(e));
        if !e.is_dir() && !e.is_volume_label() {
            files += 1;
            bytes += e.size as u64;
        }
    }
    println!("{} file(s), {}", files, size_to_string(bytes));

    Ok(())
}
