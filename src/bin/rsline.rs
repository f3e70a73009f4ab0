use std::env;
use std::io;
use std::process;

use clap::{Parser, ValueEnum};
use rsline::{LineFormat, Mode, ReedSolomon, Session, SessionConfig, SessionError, PARITY_COUNT};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rsline",
    version,
    about = "Reed-Solomon encode/decode, one line at a time"
)]
struct Cli {
    /// Direction: `encode` appends parity, `decode` checks and repairs.
    #[arg(value_enum)]
    mode: Option<CliMode>,

    /// Encode: read hex instead of raw lines. Decode: print recovered data as hex.
    #[arg(long)]
    hex: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliMode {
    Encode,
    Decode,
}

impl From<CliMode> for Mode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Encode => Mode::Encode,
            CliMode::Decode => Mode::Decode,
        }
    }
}

fn usage() {
    eprintln!(
        "Usage: rsline {{encode|decode}} [--hex]\n\n\
         encode: each input line becomes a hex codeword (message + {PARITY_COUNT} parity bytes).\n\
         \x20       With --hex, input lines are hex instead of raw bytes.\n\
         decode: each input line is a hex codeword; write \"__\" for an erased byte.\n\
         \x20       Output is \"G \", \"C \" or \"B \" (good, corrected, bad) followed by the data,\n\
         \x20       raw or, with --hex, as hex.\n\n\
         Set DEBUG to any value for diagnostics on stderr."
    );
}

/// Diagnostics go to stderr; stdout carries only data lines.
///
/// `DEBUG` (any value) forces debug level, otherwise `RUST_LOG` applies, defaulting to warn.
fn setup_tracing() {
    let filter = if env::var_os("DEBUG").is_some() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let Some(mode) = cli.mode else {
        usage();
        println!("NPAR={PARITY_COUNT}");
        process::exit(1);
    };

    setup_tracing();

    let config = SessionConfig {
        mode: mode.into(),
        format: if cli.hex { LineFormat::Hex } else { LineFormat::Raw },
    };
    debug!(?config, parity = PARITY_COUNT, "starting session");

    let session = Session::new(ReedSolomon::new(PARITY_COUNT), config);
    match session.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(_) => {}
        Err(SessionError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("output closed, stopping");
        }
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_and_hex_flag() {
        let cli = Cli::try_parse_from(["rsline", "decode", "--hex"]).unwrap();
        assert_eq!(cli.mode, Some(CliMode::Decode));
        assert!(cli.hex);
    }

    #[test]
    fn mode_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["rsline"]).unwrap();
        assert_eq!(cli.mode, None);
        assert!(!cli.hex);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["rsline", "transcode"]).is_err());
    }

    #[test]
    fn mode_maps_to_session_mode() {
        assert_eq!(Mode::from(CliMode::Encode), Mode::Encode);
        assert_eq!(Mode::from(CliMode::Decode), Mode::Decode);
    }
}
