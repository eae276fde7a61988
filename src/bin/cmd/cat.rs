use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::{
    utils::{open_disk, parse_name, write_escaped},
    CommonDiskOptions,
};
use anyhow::Context;
use clap::Parser;
use fat12util::fs::fat::Fat12;

#[derive(Parser)]
#[clap(about = "Extract a file from the root directory")]
pub struct Command {
    #[clap(flatten)]
    pub disk: CommonDiskOptions,

    #[clap(help = "File name, e.g. KERNEL.BIN")]
    pub name: String,

    #[clap(
        long,
        help = "Match the name byte for byte, space padded to 11 bytes (e.g. \"KERNEL  BIN\")"
    )]
    pub raw_name: bool,

    #[clap(long, help = "Write file contents as is instead of escaping unprintable bytes")]
    pub binary: bool,

    #[clap(long = "out", parse(from_os_str), help = "Output file")]
    pub output: Option<PathBuf>,
}

impl Command {
    fn get_output_stream(&self) -> anyhow::Result<Box<dyn Write>> {
        if let Some(path) = self.output.as_deref() {
            Ok(Box::new(BufWriter::new(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .context("failed to open output file")?,
            )))
        } else {
            Ok(Box::new(BufWriter::new(std::io::stdout())))
        }
    }
}

pub fn run(command: Command) -> anyhow::Result<()> {
    let name = parse_name(&command.name, command.raw_name)?;

    let mut disk = open_disk(&command.disk.file)?;
    let mut fs = Fat12::open(&mut disk).context("failed to load filesystem")?;

    let data = fs
        .extract_by_name(name.as_bytes())
        .with_context(|| format!("could not read file {}", command.name))?;
    info!("read {} ({} bytes)", name, data.len());

    let mut out = command.get_output_stream()?;
    if command.binary {
        out.write_all(&data).context("write failed")?;
    } else {
        write_escaped(&mut out, &data).context("write failed")?;
    }
    out.flush().context("write failed")?;

    Ok(())
}
