//! Logger setup.
//!
//! Everything the CLI prints goes through `log`, so `--quiet` and
//! `--logfile` apply to all of it. Log lines go to stdout; a logfile gets the
//! same lines with ANSI escapes stripped.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Log target that tees to stdout and an optional plain-text file.
struct TeeWriter {
    file: Option<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        if let Some(file) = &mut self.file {
            file.write_all(&strip_ansi_escapes::strip(buf))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        Ok(())
    }
}

fn level_filter(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install the global logger.
///
/// Our own crates log at the level the flags select; dependencies only ever
/// show warnings. `RUST_LOG` can still override either.
pub(crate) fn init(verbose: bool, quiet: bool, logfile: Option<&Path>) -> io::Result<()> {
    let file = logfile.map(File::create).transpose()?;

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("horadric", level_filter(verbose, quiet))
        .parse_default_env()
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .format(move |buf, record| {
            let prefix = match record.level() {
                Level::Error => format!("{} ", "error:".if_supports_color(Stdout, |t| t.red())),
                Level::Warn => format!("{} ", "warning:".if_supports_color(Stdout, |t| t.yellow())),
                _ => String::new(),
            };
            if verbose {
                writeln!(
                    buf,
                    "{} {:<5} {}{}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    prefix,
                    record.args()
                )
            } else {
                writeln!(buf, "{}{}", prefix, record.args())
            }
        });

    builder
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_default_level() {
        assert_eq!(level_filter(false, true), LevelFilter::Warn);
        assert_eq!(level_filter(true, false), LevelFilter::Debug);
        assert_eq!(level_filter(false, false), LevelFilter::Info);
    }

    #[test]
    fn logfile_copy_has_no_escapes() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut tee = TeeWriter {
            file: Some(tmp.reopen().unwrap()),
        };
        tee.write_all(b"\x1b[33mwarning:\x1b[0m missing icon\n").unwrap();
        tee.flush().unwrap();
        let written = std::fs::read_to_string(tmp.path()).unwrap();
        assert_eq!(written, "warning: missing icon\n");
    }
}
