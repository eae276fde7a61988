use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[macro_use]
extern crate log;

mod cmd;
mod utils;

#[derive(Args)]
pub struct CommonDiskOptions {
    #[clap(name = "image", parse(from_os_str), help = "FAT12 disk image")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    #[clap(alias = "type")]
    Cat(cmd::cat::Command),
    #[clap(alias = "ls")]
    Dir(cmd::dir::Command),
    Info(cmd::info::Command),
    Chain(cmd::chain::Command),
}

#[derive(Parser)]
#[clap(about = "Read files from FAT12 disk images")]
struct Options {
    #[clap(short, long, parse(from_occurrences), global = true)]
    pub verbose: u32,

    #[clap(subcommand)]
    pub command: Command,
}

fn main() -> anyhow::Result<()> {
    better_panic::install();
    let o = Options::parse();
    utils::setup_logging(o.verbose)?;

    match o.command {
        Command::Cat(c) => cmd::cat::run(c),
        Command::Dir(c) => cmd::dir::run(c),
        Command::Info(c) => cmd::info::run(c),
        Command::Chain(c) => cmd::chain::run(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let o = Options::try_parse_from(&[
            "fat12",
            "-vv",
            "cat",
            "floppy.img",
            "kernel.bin",
            "--binary",
        ])
        .unwrap();
        assert_eq!(o.verbose, 2);
        match o.command {
            Command::Cat(c) => {
                assert_eq!(c.disk.file, PathBuf::from("floppy.img"));
                assert_eq!(c.name, "kernel.bin");
                assert!(c.binary);
                assert!(!c.raw_name);
                assert!(c.output.is_none());
            }
            _ => panic!("expected cat"),
        }

        let o = Options::try_parse_from(&["fat12", "ls", "floppy.img", "--all"]).unwrap();
        assert!(matches!(o.command, Command::Dir(ref c) if c.all));

        assert!(Options::try_parse_from(&["fat12", "cat", "floppy.img"]).is_err());
        assert!(Options::try_parse_from(&["fat12"]).is_err());
    }
}
