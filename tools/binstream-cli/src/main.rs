use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use binstream::composite::{sha256_reader, Uid128};
use binstream::{Decoder, Endian, Error, Kind, Result, StreamConfig};
use clap::{Parser, Subcommand};
use log::{debug, error};

/// Inspect binstream-encoded data.
#[derive(Parser, Debug)]
#[command(name = "binstream", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a file as offset, hex bytes and ASCII.
    Hexdump { file: PathBuf },
    /// Print the SHA-256 digest of each file.
    Sha256sum {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Decode a file according to a comma-separated layout, e.g. `bool,u16,str,fixed:4`.
    Decode {
        #[arg(long, short)]
        layout: String,
        /// little, big, native or network
        #[arg(long, short, default_value = "network")]
        endian: Endian,
        file: PathBuf,
    },
    /// Print a freshly generated identifier.
    Uid {
        /// Generate a ULID instead of a random UUID.
        #[arg(long)]
        ulid: bool,
    },
}

const BYTES_PER_LINE: usize = 16;

fn hexdump_line(offset: usize, chunk: &[u8]) -> String {
    let mut hex_part = String::with_capacity(BYTES_PER_LINE * 3 + 1);
    for i in 0..BYTES_PER_LINE {
        if i == BYTES_PER_LINE / 2 {
            hex_part.push(' ');
        }
        match chunk.get(i) {
            Some(byte) => hex_part.push_str(&format!("{} ", hex::encode([*byte]))),
            None => hex_part.push_str("   "),
        }
    }
    let ascii: String = chunk
        .iter()
        .map(|b| if b.is_ascii_graphic() || *b == b' ' { *b as char } else { '.' })
        .collect();
    format!("{:08x}  {} |{}|", offset, hex_part, ascii)
}

fn hexdump(data: &[u8], out: &mut impl Write) -> Result<()> {
    for (index, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        writeln!(out, "{}", hexdump_line(index * BYTES_PER_LINE, chunk))?;
    }
    writeln!(out, "{:08x}", data.len())?;
    Ok(())
}

fn parse_layout(layout: &str) -> Result<Vec<Kind>> {
    layout
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}

fn decode(data: &[u8], layout: &[Kind], endian: Endian, out: &mut impl Write) -> Result<()> {
    let mut dec = Decoder::with_config(data, StreamConfig::new(endian));
    for (index, kind) in layout.iter().enumerate() {
        let at = dec.position();
        match dec.read_value(*kind) {
            Some(value) => writeln!(out, "{:>4} @{:<6} {:?} = {}", index, at, kind, value)?,
            None => break,
        }
    }
    debug!("decode finished at {} with {:?}", dec.position(), dec.status());
    if !dec.is_good() {
        return Err(Error::CodecError(format!(
            "stream {:?} at byte {} ({} bytes left)",
            dec.status(),
            dec.position(),
            dec.available()
        )));
    }
    writeln!(out, "{} bytes left", dec.available())?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Hexdump { file } => hexdump(&fs::read(file)?, &mut out),
        Command::Sha256sum { files } => {
            for file in files {
                let digest = sha256_reader(fs::File::open(&file)?)?;
                writeln!(out, "{}  {}", digest, file.display())?;
            }
            Ok(())
        }
        Command::Decode { layout, endian, file } => {
            let kinds = parse_layout(&layout)?;
            decode(&fs::read(file)?, &kinds, endian, &mut out)
        }
        Command::Uid { ulid } => {
            if ulid {
                writeln!(out, "{}", Uid128::new_ulid().to_ulid_string())?;
            } else {
                writeln!(out, "{}", Uid128::new_v4())?;
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("binstream: {}", e);
            ExitCode::FAILURE
        }
    }
}
