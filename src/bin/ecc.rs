use clap::{Args, Parser, Subcommand, ValueEnum};
use ecc_kernel::cs::ecc::{
    checksum_batch, inject_random_error, BatchItem, BitWidth, ChecksumConfig, ChecksumEngine,
    ChecksumSource, Codeword, HammingCodec, Payload,
};
use ecc_kernel::{Error, Result};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Additive checksums and Hamming(7,4) error correction.
#[derive(Parser, Debug)]
#[command(name = "ecc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Register width and initial value, from flags or the environment.
#[derive(Args, Debug, Clone, Copy)]
struct ChecksumArgs {
    /// Register width in bits: 8, 16 or 32
    #[arg(long, env = "ECC_WIDTH", default_value_t = 16)]
    width: u32,

    /// Initial accumulator value, decimal or 0x-prefixed hex
    #[arg(long, env = "ECC_INIT", default_value = "0", value_parser = parse_initial_value)]
    init: u64,
}

impl ChecksumArgs {
    fn engine(&self) -> Result<ChecksumEngine> {
        let width = BitWidth::try_from(self.width)?;
        let config = ChecksumConfig::with_width(width).with_initial_value(self.init);
        Ok(ChecksumEngine::new(config))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the checksum of a message
    Checksum {
        message: String,
        #[command(flatten)]
        config: ChecksumArgs,
    },
    /// Encode a 4-bit payload into a 7-bit codeword
    Encode { payload: String },
    /// Decode a 7-bit codeword, correcting a single flipped bit
    Decode { codeword: String },
    /// Toggle one bit (0-based index) of a codeword
    Flip { codeword: String, index: usize },
    /// Encode a payload, flip a random bit and decode it again
    Simulate {
        payload: String,
        /// Seed for the bit choice; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Checksum a list of files
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// What to checksum for each file
        #[arg(long, value_enum, default_value_t = SourceArg::Content)]
        source: SourceArg,
        #[command(flatten)]
        config: ChecksumArgs,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SourceArg {
    Content,
    NameAndSize,
}

impl From<SourceArg> for ChecksumSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Content => ChecksumSource::Content,
            SourceArg::NameAndSize => ChecksumSource::NameAndSize,
        }
    }
}

fn parse_initial_value(text: &str) -> std::result::Result<u64, String> {
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid initial value {:?}: {}", text, e))
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Checksum { message, config } => {
            let engine = config.engine()?;
            debug!("using {}", engine);
            // An empty message is shown as no checksum at all
            if message.is_empty() {
                println!();
            } else {
                println!("{}", engine.compute(&message));
            }
        }
        Command::Encode { payload } => {
            let payload: Payload = payload.parse()?;
            println!("{}", HammingCodec::new().encode(&payload));
        }
        Command::Decode { codeword } => {
            let received: Codeword = codeword.parse()?;
            let outcome = HammingCodec::new().decode(&received);
            if outcome.had_error() {
                println!(
                    "{} (corrected bit {}: {} -> {})",
                    outcome.corrected_payload,
                    outcome.error_position.unwrap_or_default(),
                    received,
                    outcome.corrected_codeword
                );
            } else {
                println!("{} (no error)", outcome.corrected_payload);
            }
        }
        Command::Flip { codeword, index } => {
            let codeword: Codeword = codeword.parse()?;
            println!("{}", codeword.flip_bit(index)?);
        }
        Command::Simulate { payload, seed } => {
            let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
            info!("simulation seed: {}", seed);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let codec = HammingCodec::new();
            let payload: Payload = payload.parse()?;
            let codeword = codec.encode(&payload);
            let (damaged, flipped) = inject_random_error(&codeword, &mut rng);
            let outcome = codec.decode(&damaged);

            println!("payload   {}", payload);
            println!("encoded   {}", codeword);
            println!("received  {} (flipped bit {})", damaged, flipped);
            println!(
                "decoded   {} (error position {})",
                outcome.corrected_payload,
                outcome
                    .error_position
                    .map_or_else(|| "none".to_string(), |p| p.to_string())
            );
        }
        Command::Batch {
            files,
            source,
            config,
        } => {
            let engine = config.engine()?;
            let items = files
                .iter()
                .map(|path| BatchItem::from_path(path))
                .collect::<Result<Vec<_>>>()?;
            for record in checksum_batch(&engine, &items, source.into()) {
                println!("{}  {}  {}", record.checksum, record.size, record.name);
            }
        }
    }
    Ok(())
}

/// Exit status for a failed command: 2 for malformed input, 1 for anything else.
fn exit_status(error: &Error) -> u8 {
    if error.is_invalid_input() {
        2
    } else {
        1
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_initial_value() {
        assert_eq!(parse_initial_value("0"), Ok(0));
        assert_eq!(parse_initial_value("255"), Ok(255));
        assert_eq!(parse_initial_value("0xFF"), Ok(255));
        assert_eq!(parse_initial_value("0Xbeef"), Ok(0xBEEF));
        assert!(parse_initial_value("-1").is_err());
        assert!(parse_initial_value("0xZZ").is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_checksum_args() {
        let cli = Cli::try_parse_from(["ecc", "checksum", "A", "--width", "8", "--init", "0x10"])
            .unwrap();
        match cli.command {
            Command::Checksum { message, config } => {
                assert_eq!(message, "A");
                assert_eq!(config.engine().unwrap().compute(&message), "51");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_width_is_rejected() {
        let args = ChecksumArgs { width: 24, init: 0 };
        assert!(matches!(args.engine(), Err(Error::UnsupportedConfig(_))));
    }

    #[test]
    fn test_empty_message_still_validates_config() {
        let result = run(Command::Checksum {
            message: String::new(),
            config: ChecksumArgs { width: 24, init: 0 },
        });
        assert!(matches!(result, Err(Error::UnsupportedConfig(_))));

        let result = run(Command::Checksum {
            message: String::new(),
            config: ChecksumArgs { width: 8, init: 0 },
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_exit_status() {
        let bad_payload = "10a1".parse::<Payload>().unwrap_err();
        assert_eq!(exit_status(&bad_payload), 2);

        let bad_width = ChecksumArgs { width: 12, init: 0 }.engine().unwrap_err();
        assert_eq!(exit_status(&bad_width), 1);

        let bad_index = Error::BitIndexOutOfRange { index: 9, len: 7 };
        assert_eq!(exit_status(&bad_index), 1);
    }
}
