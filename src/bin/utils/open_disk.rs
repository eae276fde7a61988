use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::Context;
use fat12util::disk::raw::RawDisk;

pub fn open_disk(path: &Path) -> anyhow::Result<RawDisk<File>> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("cannot open disk image {}", path.display()))?;

    Ok(RawDisk::open(file).context("failed to determine image size (is this a regular file?)")?)
}
