//! piedpiper: a huffman coding compression tool
//!
//! ## Usage
//!
//! ```bash
//! piedpiper encode --input notes.txt --output notes.pp
//! piedpiper decode --input notes.pp --output notes.txt
//! piedpiper inspect --input notes.pp
//!
//! # Per-call sizes and tree summary
//! piedpiper --log-level debug encode -i notes.txt -o notes.pp
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use itertools::Itertools;
use thiserror::Error;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use piedpiper::container::Container;
use piedpiper::huffman::format_code;
use piedpiper::tree_codec::deserialize_tree;
use piedpiper::{CodeTable, EncodeReport, HuffmanDecoder, HuffmanEncoder, HuffmanError};

#[derive(Parser, Debug)]
#[command(name = "piedpiper")]
#[command(version)]
#[command(about = "A huffman coding compression tool", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PIEDPIPER_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a container
    Encode(Paths),
    /// Restore the original file from a container
    Decode(Paths),
    /// Print a container's framing and code table
    Inspect {
        /// Path of the container
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Paths {
    /// Path of input file
    #[arg(short, long)]
    input: PathBuf,

    /// Path of output file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("failed to open input file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write output file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to {action} {}: {source}", .path.display())]
    Codec {
        action: &'static str,
        path: PathBuf,
        source: HuffmanError,
    },
}

impl CliError {
    fn category(&self) -> &'static str {
        match self {
            CliError::Read { .. } => "read",
            CliError::Write { .. } => "write",
            CliError::Codec { source, .. } => source.category(),
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(args.command) {
        Ok(Some(text)) => println!("{}", text),
        Ok(None) => {}
        Err(err) => {
            error!(category = err.category(), "{}", err);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {}", e);
    }
}

/// Runs one subcommand; returns text to print on stdout, if any.
fn run(command: Command) -> Result<Option<String>, CliError> {
    match command {
        Command::Encode(paths) => {
            let report = encode_file(&paths.input, &paths.output)?;
            info!(
                input = %paths.input.display(),
                output = %paths.output.display(),
                bit_count = report.bit_count,
                packed_len = report.packed_len,
                container_len = report.container_len,
                "compressed"
            );
            Ok(None)
        }
        Command::Decode(paths) => {
            let len = decode_file(&paths.input, &paths.output)?;
            info!(
                input = %paths.input.display(),
                output = %paths.output.display(),
                output_len = len,
                "decompressed"
            );
            Ok(None)
        }
        Command::Inspect { input } => inspect_file(&input).map(Some),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn encode_file(input: &Path, output: &Path) -> Result<EncodeReport, CliError> {
    let data = read_input(input)?;
    let codec_error = |source| CliError::Codec {
        action: "compress",
        path: input.to_path_buf(),
        source,
    };

    let mut encoder = HuffmanEncoder::default();
    encoder.pack(&data).map_err(codec_error)?;
    let (report, container) = encoder.finish().map_err(codec_error)?;

    write_output(output, &container)?;
    Ok(report)
}

fn decode_file(input: &Path, output: &Path) -> Result<usize, CliError> {
    let container = read_input(input)?;
    let data = HuffmanDecoder::default()
        .unpack(&container)
        .map_err(|source| CliError::Codec {
            action: "decompress",
            path: input.to_path_buf(),
            source,
        })?;

    write_output(output, &data)?;
    Ok(data.len())
}

fn inspect_file(input: &Path) -> Result<String, CliError> {
    let bytes = read_input(input)?;
    let codec_error = |source| CliError::Codec {
        action: "inspect",
        path: input.to_path_buf(),
        source,
    };

    let container = Container::parse(&bytes).map_err(codec_error)?;
    let header = container.header();
    let tree = deserialize_tree(container.tree_block).map_err(codec_error)?;

    let mut lines = vec![
        format!("container: {} bytes", header.container_len()),
        format!("tree block: {} bytes", header.tree_block_len),
        format!("bit count: {}", header.bit_count),
        format!("packed bits: {} bytes", header.packed_len),
    ];

    match tree {
        None => lines.push("tree: none".to_string()),
        Some(tree) => {
            lines.push(format!("input bytes: {}", tree.frequency()));
            lines.push(format!("symbols: {}", tree.leaf_count()));
            lines.push(format!("depth: {}", tree.depth()));
            let codes = CodeTable::from_tree(&tree);
            lines.extend(codes.iter().map(|(symbol, code)| {
                let shown = if symbol.is_ascii_graphic() {
                    symbol as char
                } else {
                    '.'
                };
                format!("  0x{:02x} {} {}", symbol, shown, format_code(code))
            }));
        }
    }

    Ok(lines.into_iter().join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::try_parse_from([
            "piedpiper",
            "decode",
            "--input",
            "in.pp",
            "-o",
            "out.txt",
        ])
        .unwrap();
        assert_eq!(args.log_level, "warn");
        match args.command {
            Command::Decode(paths) => {
                assert_eq!(paths.input, PathBuf::from("in.pp"));
                assert_eq!(paths.output, PathBuf::from("out.txt"));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Args::try_parse_from(["piedpiper", "encode", "--input", "x"]).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("original.txt");
        let compressed = dir.path().join("original.pp");
        let restored = dir.path().join("restored.txt");

        let text = b"she sells sea shells by the sea shore".repeat(20);
        fs::write(&original, &text).unwrap();

        let report = encode_file(&original, &compressed).unwrap();
        assert_eq!(report.input_len, text.len());
        assert_eq!(
            fs::metadata(&compressed).unwrap().len() as usize,
            report.container_len
        );

        assert_eq!(decode_file(&compressed, &restored).unwrap(), text.len());
        assert_eq!(fs::read(&restored).unwrap(), text);
    }

    #[test]
    fn test_output_is_truncated() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("a.txt");
        let compressed = dir.path().join("a.pp");
        fs::write(&original, b"ab").unwrap();
        fs::write(&compressed, vec![0xff; 4096]).unwrap();

        encode_file(&original, &compressed).unwrap();
        let restored = dir.path().join("b.txt");
        decode_file(&compressed, &restored).unwrap();
        assert_eq!(fs::read(&restored).unwrap(), b"ab");
    }

    #[test]
    fn test_decode_corrupt_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.pp");
        fs::write(&input, b"abcde").unwrap();

        let err = decode_file(&input, &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, CliError::Codec { .. }));
        assert_eq!(err.category(), "truncated_input");
        assert!(err.to_string().starts_with("failed to decompress"));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let err = encode_file(&dir.path().join("missing"), &dir.path().join("out")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_inspect() {
        let dir = tempdir().unwrap();
        let original = dir.path().join("abca.txt");
        let compressed = dir.path().join("abca.pp");
        fs::write(&original, b"abca").unwrap();
        encode_file(&original, &compressed).unwrap();

        let text = inspect_file(&compressed).unwrap();
        assert!(text.contains("bit count: 6"));
        assert!(text.contains("packed bits: 1 bytes"));
        assert!(text.contains("input bytes: 4"));
        assert!(text.contains("symbols: 3"));
        assert!(text.contains("  0x61 a 0"));
        assert!(text.contains("  0x62 b 10"));
        assert!(text.contains("  0x63 c 11"));
    }
}
