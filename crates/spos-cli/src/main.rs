/// SPOS command-line tool — encode, decode and generate compact
/// bit-packed messages from JSON payload specifications.
///
/// # Usage overview
///
/// ```text
/// spos [-d] -p SPEC... [-f bin|hex|bytes] [-r | -I] [-m] [-s]
///      [-i INPUT] [-o OUTPUT] [-v]
///
/// Modes:
///   (default)   encode: read payload data (JSON) and print the message
///   -d          decode: read a message and print the payload (JSON)
///   -r          print a random valid message for the spec
///   -I          print random payload data (JSON) for the spec
///
/// Options:
///   -p SPEC...  payload spec file(s); several specs switch decoding
///               to versioned dispatch
///   -f FORMAT   message format: bin (default), hex, or bytes
///   -m          include meta alongside body in decode output
///   -s          print spec and message statistics to stderr
///   -i INPUT    read from this file instead of stdin
///   -o OUTPUT   write to this file instead of stdout
///   -v          verbose output
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                        |
/// |------|------------------------------------------------|
/// | 0    | Success                                        |
/// | 1    | Error (bad spec, bad input, CRC mismatch, I/O) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::Parser;

mod cmd_decode;
mod cmd_encode;
mod cmd_random;
mod io;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Encode and decode compact bit-packed payloads.
#[derive(Parser)]
#[command(name = "spos", version, about = "Small Payload Object Serializer CLI")]
struct Cli {
    /// Decode a message instead of encoding payload data.
    #[arg(short, long)]
    decode: bool,

    /// Payload spec file(s); several specs enable versioned decoding.
    #[arg(short = 'p', long = "payload-spec", required = true, num_args = 1..)]
    payload_specs: Vec<PathBuf>,

    /// Message format: bin, hex or bytes.
    #[arg(short, long, default_value = "bin")]
    format: String,

    /// Generate a random message for the spec.
    #[arg(short = 'r', long, conflicts_with = "random_input")]
    random_message: bool,

    /// Generate random payload data (JSON) for the spec.
    #[arg(short = 'I', long)]
    random_input: bool,

    /// Include meta alongside body in decode output.
    #[arg(short, long)]
    meta: bool,

    /// Print spec and message statistics to stderr.
    #[arg(short, long)]
    stats: bool,

    /// Read input from this file instead of stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Write output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let result = if cli.random_message || cli.random_input {
        cmd_random::run(&cli)
    } else if cli.decode {
        cmd_decode::run(&cli)
    } else {
        cmd_encode::run(&cli)
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
