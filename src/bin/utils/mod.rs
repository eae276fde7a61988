mod open_disk;
mod render;

pub use open_disk::*;
pub use render::*;

use std::io;

use fat12util::fs::fat::ShortName;

pub fn setup_logging(verbosity_level: u32) -> anyhow::Result<()> {
    use fern::colors::{Color, ColoredLevelConfig};

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .debug(Color::BrightWhite)
        .trace(Color::Cyan);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let color = colors.get_color(&record.level());
            let prefix = format!(
                "[{}][{}]\x1b[{}m ",
                record.target(),
                record.level(),
                color.to_fg_str()
            );
            const SUFFIX: &str = "\x1b[0m";

            let s = format!("{}", message);
            let mut buf = String::with_capacity(s.len() + prefix.len() + SUFFIX.len());
            for (i, line) in s.split('\n').enumerate() {
                if i != 0 {
                    buf.push('\n');
                }
                buf += &prefix;
                buf += line;
                buf += SUFFIX;
            }

            out.finish(format_args!("{}", buf))
        })
        .level(match verbosity_level {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        // stdout carries file contents
        .chain(io::stderr())
        .apply()?;

    Ok(())
}

pub fn parse_name(name: &str, raw: bool) -> fat12util::Result<ShortName> {
    if raw {
        ShortName::from_raw(name.as_bytes())
    } else {
        ShortName::parse(name)
    }
}

#[allow(non_upper_case_globals)]
pub fn size_to_string(s: u64) -> String {
    const KiB: u64 = 1024;
    const MiB: u64 = 1024 * KiB;
    const GiB: u64 = 1024 * MiB;

    match s {
        0..=1023 => format!("{} B", s),
        1024..=1048575 => format!("{} KiB", s / KiB),
        1048576..=1073741823 => format!("{} MiB", s / MiB),
        _ => format!("{} GiB", s / GiB),
    }
}
