// Command-line interface for segamd.
//
// Subcommands map one-to-one onto the library modules; this file owns all
// file I/O and process exit codes, the modules stay side-effect free.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::checksum::Algorithm;
use crate::codec::Codec;
use crate::gfx::{Palette, Tiles};
use crate::header::{self, Header};
use crate::pcm::{self, PcmFormat};
use crate::rom::Rom;
use crate::split;

// ---------------------------------------------------------------------------
// Shared value parsers
// ---------------------------------------------------------------------------

/// Parse a byte offset, decimal or 0x-prefixed hexadecimal.
fn parse_offset(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{s}': {e}"))
}

fn parse_algorithm(s: &str) -> Result<Algorithm, String> {
    s.parse::<Algorithm>().map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Sega Genesis / Mega Drive ROM toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "segamd",
    version,
    about = "Sega Genesis / Mega Drive ROM toolkit",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stdout.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a file with a cartridge codec.
    Compress(CodecArgs),
    /// Decompress a file with a cartridge codec.
    Decompress(CodecArgs),
    /// Image digest checksums.
    #[command(subcommand)]
    Checksum(ChecksumCmd),
    /// Cartridge header inspection and repair.
    #[command(subcommand)]
    Header(HeaderCmd),
    /// Extract byte ranges listed in a split file.
    Split(SplitArgs),
    /// Tile graphics conversion.
    #[command(subcommand)]
    Gfx(GfxCmd),
    /// Raw PCM audio conversion.
    #[command(subcommand)]
    Pcm(PcmCmd),
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Compression scheme: SEGARD, NAMCO or TECHNOSOFT.
    #[arg(short = 'a', long)]
    algorithm: String,

    /// Start offset of the stream inside the input file.
    #[arg(long, value_parser = parse_offset, default_value = "0")]
    offset: usize,

    /// Input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Subcommand, Debug)]
enum ChecksumCmd {
    /// Print one digest of the image.
    Get {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// md5, sha1 or crc32.
        #[arg(value_parser = parse_algorithm)]
        algorithm: Algorithm,
    },
    /// Compare the image against an expected digest.
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// md5, sha1 or crc32.
        #[arg(value_parser = parse_algorithm)]
        algorithm: Algorithm,
        /// Expected digest, hex, case-insensitive.
        value: String,
    },
    /// Print every supported digest of the image.
    List {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum HeaderCmd {
    /// Print the decoded cartridge header.
    Info {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
    /// Recompute the header checksum and write a fixed image.
    Fix {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Image to split.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Split list: one `0xSTART,0xEND,PATH` line per output file.
    #[arg(value_hint = ValueHint::FilePath)]
    list: PathBuf,
}

#[derive(Subcommand, Debug)]
enum GfxCmd {
    /// Render packed tiles through a palette into a PNG sheet.
    ToPng {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Palette data (16 big-endian color words).
        #[arg(value_hint = ValueHint::FilePath)]
        palette: PathBuf,
        /// Sheet width in tiles.
        #[arg(long, default_value_t = 16)]
        width: usize,
        /// Bits per pixel: 1, 2, 4 or 8.
        #[arg(long, default_value_t = 4)]
        bpp: usize,
    },
}

#[derive(Subcommand, Debug)]
enum PcmCmd {
    /// Wrap raw signed 8-bit PCM in a WAV container.
    ToWav {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Channel count.
        channels: u16,
        /// Sample rate in Hz.
        samplerate: u32,
    },
    /// Unwrap an 8-bit WAV back to raw PCM.
    FromWav {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(data) => Some(data),
        Err(e) => {
            eprintln!("segamd: {}: {e}", path.display());
            None
        }
    }
}

/// Write an output file, creating parent directories. Refuses to clobber
/// an existing file unless `--force` was given.
fn write_file(path: &Path, data: &[u8], force: bool) -> bool {
    if path.exists() && !force {
        eprintln!(
            "segamd: output file exists (use --force to overwrite): {}",
            path.display()
        );
        return false;
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("segamd: {}: {e}", parent.display());
        return false;
    }
    if let Err(e) = fs::write(path, data) {
        eprintln!("segamd: {}: {e}", path.display());
        return false;
    }
    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    true
}

// ---------------------------------------------------------------------------
// Codec commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Compress,
    Decompress,
}

fn cmd_codec(cli: &Cli, args: &CodecArgs, direction: Direction) -> i32 {
    let Some(data) = read_file(&args.input) else {
        return 1;
    };
    if args.offset > data.len() {
        eprintln!(
            "segamd: offset {:#X} is past the end of {} ({} bytes)",
            args.offset,
            args.input.display(),
            data.len()
        );
        return 1;
    }
    // Encoders consume their whole buffer; decoders start at the cursor.
    let rom = match direction {
        Direction::Compress => Rom::new(data[args.offset..].to_vec()),
        Direction::Decompress => {
            let mut rom = Rom::new(data);
            rom.seek(args.offset);
            rom
        }
    };
    let input_size = match direction {
        Direction::Compress => rom.len(),
        Direction::Decompress => rom.len() - args.offset,
    };

    let mut codec = match Codec::select(&args.algorithm, rom) {
        Ok(codec) => codec,
        Err(e) => {
            eprintln!(
                "segamd: {e}, valid algorithms: {}",
                Codec::ALGORITHMS.join(", ")
            );
            return 1;
        }
    };
    let result = match direction {
        Direction::Compress => codec.encode(),
        Direction::Decompress => codec.decode(),
    };
    let data = match result {
        Ok(data) => data,
        Err(e) => {
            eprintln!("segamd: {}: {e}", args.input.display());
            return 1;
        }
    };
    if data.is_empty() {
        log::warn!("{}: produced no output bytes", args.input.display());
    }
    if !write_file(&args.output, &data, cli.force) {
        return 1;
    }
    if cli.json_output {
        let stats = serde_json::json!({
            "algorithm": args.algorithm,
            "input_size": input_size,
            "output_size": data.len(),
            "ratio": if input_size > 0 {
                data.len() as f64 / input_size as f64
            } else {
                0.0
            },
        });
        println!("{stats}");
    } else if !cli.quiet {
        println!("{} -> {} bytes", input_size, data.len());
    }
    0
}

// ---------------------------------------------------------------------------
// Checksum commands
// ---------------------------------------------------------------------------

fn cmd_checksum(cli: &Cli, cmd: &ChecksumCmd) -> i32 {
    match cmd {
        ChecksumCmd::Get { input, algorithm } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            println!("{}", algorithm.digest(&data));
            0
        }
        ChecksumCmd::Check {
            input,
            algorithm,
            value,
        } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            if crate::checksum::verify(*algorithm, &data, value) {
                if !cli.quiet {
                    println!("Checksum matches");
                }
                0
            } else {
                eprintln!(
                    "segamd: checksum does not match: expected {}, got {}",
                    value.to_uppercase(),
                    algorithm.digest(&data)
                );
                1
            }
        }
        ChecksumCmd::List { input } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            for algorithm in Algorithm::ALL {
                println!("{}:\t{}", algorithm.to_string().to_uppercase(), algorithm.digest(&data));
            }
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Header commands
// ---------------------------------------------------------------------------

fn cmd_header(cli: &Cli, cmd: &HeaderCmd) -> i32 {
    match cmd {
        HeaderCmd::Info { input } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            let header = match Header::parse(&data) {
                Ok(header) => header,
                Err(e) => {
                    eprintln!("segamd: {}: {e}", input.display());
                    return 1;
                }
            };
            let computed = header::word_checksum(&data);
            println!("Console:             {}", header.console.trim_end());
            println!("Copyright:           {}", header.copyright.trim_end());
            println!("Domestic title:      {}", header.domestic_title.trim_end());
            println!(
                "International title: {}",
                header.international_title.trim_end()
            );
            println!("Serial number:       {}", header.serial_number.trim_end());
            println!("Devices:             {}", header.devices.trim_end());
            println!("Region:              {}", header.region.trim_end());
            println!(
                "ROM:                 {:#010X}..{:#010X}",
                header.rom_start, header.rom_end
            );
            println!(
                "RAM:                 {:#010X}..{:#010X}",
                header.ram_start, header.ram_end
            );
            if header.checksum == computed {
                println!("Checksum:            {:#06X} (ok)", header.checksum);
            } else {
                println!(
                    "Checksum:            {:#06X} (computed {computed:#06X})",
                    header.checksum
                );
            }
            0
        }
        HeaderCmd::Fix { input, output } => {
            let Some(mut data) = read_file(input) else {
                return 1;
            };
            let sum = match header::update_checksum(&mut data) {
                Ok(sum) => sum,
                Err(e) => {
                    eprintln!("segamd: {}: {e}", input.display());
                    return 1;
                }
            };
            if !write_file(output, &data, cli.force) {
                return 1;
            }
            if !cli.quiet {
                println!("Checksum set to {sum:#06X}");
            }
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Split command
// ---------------------------------------------------------------------------

fn cmd_split(cli: &Cli, args: &SplitArgs) -> i32 {
    let Some(data) = read_file(&args.input) else {
        return 1;
    };
    let list = match fs::read_to_string(&args.list) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("segamd: {}: {e}", args.list.display());
            return 1;
        }
    };
    let entries = match split::parse_list(&list) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("segamd: {}: {e}", args.list.display());
            return 1;
        }
    };
    for entry in &entries {
        let slice = match split::extract(&data, entry) {
            Ok(slice) => slice,
            Err(e) => {
                eprintln!("segamd: {}: {e}", args.input.display());
                return 1;
            }
        };
        if !write_file(&entry.path, slice, cli.force) {
            return 1;
        }
        if !cli.quiet {
            println!("{}", entry.path.display());
        }
    }
    0
}

// ---------------------------------------------------------------------------
// Gfx commands
// ---------------------------------------------------------------------------

fn cmd_gfx(cli: &Cli, cmd: &GfxCmd) -> i32 {
    match cmd {
        GfxCmd::ToPng {
            input,
            output,
            palette,
            width,
            bpp,
        } => {
            let (Some(data), Some(palette_data)) = (read_file(input), read_file(palette)) else {
                return 1;
            };
            let tiles = match Tiles::new(&data, *width, *bpp) {
                Ok(tiles) => tiles,
                Err(e) => {
                    eprintln!("segamd: {}: {e}", input.display());
                    return 1;
                }
            };
            let palette = Palette::from_bytes(&palette_data);
            if output.exists() && !cli.force {
                eprintln!(
                    "segamd: output file exists (use --force to overwrite): {}",
                    output.display()
                );
                return 1;
            }
            let file = match fs::File::create(output) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("segamd: {}: {e}", output.display());
                    return 1;
                }
            };
            if let Err(e) = tiles.write_png(&palette, BufWriter::new(file)) {
                eprintln!("segamd: {}: {e}", output.display());
                return 1;
            }
            log::info!(
                "rendered {}x{} px sheet to {}",
                tiles.width_px(),
                tiles.height_px(),
                output.display()
            );
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Pcm commands
// ---------------------------------------------------------------------------

fn cmd_pcm(cli: &Cli, cmd: &PcmCmd) -> i32 {
    match cmd {
        PcmCmd::ToWav {
            input,
            output,
            channels,
            samplerate,
        } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            let format = PcmFormat {
                channels: *channels,
                sample_rate: *samplerate,
            };
            match format.to_wav(&data) {
                Ok(wav) => {
                    if write_file(output, &wav, cli.force) {
                        0
                    } else {
                        1
                    }
                }
                Err(e) => {
                    eprintln!("segamd: {}: {e}", input.display());
                    1
                }
            }
        }
        PcmCmd::FromWav { input, output } => {
            let Some(data) = read_file(input) else {
                return 1;
            };
            match pcm::from_wav(&data) {
                Ok(samples) => {
                    if write_file(output, &samples, cli.force) {
                        0
                    } else {
                        1
                    }
                }
                Err(e) => {
                    eprintln!("segamd: {}: {e}", input.display());
                    1
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, _) => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match &cli.command {
        Cmd::Compress(args) => cmd_codec(&cli, args, Direction::Compress),
        Cmd::Decompress(args) => cmd_codec(&cli, args, Direction::Decompress),
        Cmd::Checksum(cmd) => cmd_checksum(&cli, cmd),
        Cmd::Header(cmd) => cmd_header(&cli, cmd),
        Cmd::Split(args) => cmd_split(&cli, args),
        Cmd::Gfx(cmd) => cmd_gfx(&cli, cmd),
        Cmd::Pcm(cmd) => cmd_pcm(&cli, cmd),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv: Vec<String> = std::iter::once("segamd".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).expect("cli parse failed")
    }

    #[test]
    fn parse_offset_accepts_hex_and_decimal() {
        assert_eq!(parse_offset("0x200").unwrap(), 0x200);
        assert_eq!(parse_offset("0X10").unwrap(), 0x10);
        assert_eq!(parse_offset("512").unwrap(), 512);
        assert!(parse_offset("0x").is_err());
        assert!(parse_offset("nope").is_err());
    }

    #[test]
    fn compress_subcommand_maps() {
        let cli = parse(&["compress", "-a", "SEGARD", "in.bin", "out.bin"]);
        let Cmd::Compress(args) = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.algorithm, "SEGARD");
        assert_eq!(args.offset, 0);
        assert_eq!(args.input, PathBuf::from("in.bin"));
        assert_eq!(args.output, PathBuf::from("out.bin"));
    }

    #[test]
    fn decompress_offset_flag() {
        let cli = parse(&[
            "decompress",
            "-a",
            "NAMCO",
            "--offset",
            "0x1F00",
            "in.bin",
            "out.bin",
        ]);
        let Cmd::Decompress(args) = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(args.offset, 0x1F00);
    }

    #[test]
    fn checksum_algorithms_parse() {
        let cli = parse(&["checksum", "get", "in.bin", "crc32"]);
        let Cmd::Checksum(ChecksumCmd::Get { algorithm, .. }) = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(*algorithm, Algorithm::Crc32);

        let argv = ["segamd", "checksum", "get", "in.bin", "sha256"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn gfx_defaults() {
        let cli = parse(&["gfx", "to-png", "tiles.bin", "out.png", "pal.bin"]);
        let Cmd::Gfx(GfxCmd::ToPng { width, bpp, .. }) = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(*width, 16);
        assert_eq!(*bpp, 4);
    }

    #[test]
    fn global_flags() {
        let cli = parse(&["--force", "--json", "compress", "-a", "SEGARD", "a", "b"]);
        assert!(cli.force);
        assert!(cli.json_output);
        assert!(!cli.quiet);

        let cli = parse(&["-v", "-v", "split", "rom.bin", "list.txt"]);
        assert_eq!(cli.verbose, 2);
    }
}
