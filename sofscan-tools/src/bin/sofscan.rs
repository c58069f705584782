use std::io::Write;
use std::path::PathBuf;

use sofscan_jpeg::{ScanOptions, ScanPolicy, Scanner, TruncatedRead};
use tracing_subscriber::prelude::*;

const HELP_MESSAGE: &str = "sofscan
Dump the frame headers of a JPEG file.

USAGE:
    sofscan [options] <input>

OPTIONS:
    --strict      Fail on reads past the end of the data instead of reading zero
    --segments    Jump over segments via their length and skip scan data
    -h, --help    Show this message";

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    #[error("Could not read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JPEG: {0}")]
    Jpeg(#[from] sofscan_jpeg::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Scan { path: PathBuf, options: ScanOptions },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(
            tracing_subscriber::fmt::Layer::default()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = try_main() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Error> {
    match parse_args(std::env::args().skip(1))? {
        Command::Help => {
            println!("{HELP_MESSAGE}");
            Ok(())
        }
        Command::Scan { path, options } => {
            let data = std::fs::read(&path).map_err(|source| Error::Read {
                path: path.clone(),
                source,
            })?;
            tracing::debug!("Loaded {} bytes from {}", data.len(), path.display());

            let stdout = std::io::stdout().lock();
            let mut scanner = Scanner::new(&data, std::io::BufWriter::new(stdout), options);
            let report = scanner.run()?;

            tracing::info!(
                "Found {} frame header(s) and {} segment(s)",
                report.frames.len(),
                report.segments.len()
            );

            scanner
                .into_inner()
                .flush()
                .map_err(sofscan_jpeg::Error::from)?;

            Ok(())
        }
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Command, Error> {
    let mut path = None;
    let mut options = ScanOptions::default();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--strict" => options.truncation = TruncatedRead::Fail,
            "--segments" => options.policy = ScanPolicy::Segmented,
            option if option.starts_with('-') => {
                return Err(Error::UnknownOption(option.to_string()))
            }
            _ => {
                if path.is_none() {
                    path = Some(PathBuf::from(arg));
                }
            }
        }
    }

    Ok(match path {
        Some(path) => Command::Scan { path, options },
        None => Command::Help,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, Error> {
        parse_args(args.iter().map(|x| x.to_string()))
    }

    #[test]
    fn missing_path_shows_help() {
        assert_eq!(parse(&[]).unwrap(), Command::Help);
        assert_eq!(parse(&["--strict"]).unwrap(), Command::Help);
        assert_eq!(parse(&["image.jpg", "-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn options() {
        assert_eq!(
            parse(&["image.jpg"]).unwrap(),
            Command::Scan {
                path: PathBuf::from("image.jpg"),
                options: ScanOptions::default(),
            }
        );

        assert_eq!(
            parse(&["--segments", "image.jpg", "--strict", "other.jpg"]).unwrap(),
            Command::Scan {
                path: PathBuf::from("image.jpg"),
                options: ScanOptions {
                    truncation: TruncatedRead::Fail,
                    policy: ScanPolicy::Segmented,
                },
            }
        );

        assert!(matches!(
            parse(&["--verbose", "image.jpg"]),
            Err(Error::UnknownOption(x)) if x == "--verbose"
        ));
    }

    #[test]
    fn read_error_message() {
        let err = Error::Read {
            path: PathBuf::from("missing.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("Could not read 'missing.jpg': "));
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::from(sofscan_jpeg::Error::InvalidSoi(vec![0x89, 0x50]));
        assert!(err.to_string().starts_with("JPEG: "));
    }
}
