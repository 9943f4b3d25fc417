use clap::{Parser, Subcommand};
use luhn_synth::*;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luhn-synth-cli")]
#[command(about = "Luhn Synth CLI - Expand digit patterns into checksum-valid records")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate records from a pattern such as "411111|09|2027|12"
    Generate {
        /// Pattern: prefix, then optional month, year and security-code fragment
        #[arg(short, long)]
        pattern: String,

        /// Number of records (default: 10)
        #[arg(short, long)]
        count: Option<usize>,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the batch as an index-keyed JSON object
        #[arg(long)]
        json: bool,

        /// Field delimiter inside the pattern
        #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
        delimiter: char,

        /// Retry ceiling per number
        #[arg(long, default_value_t = MAX_GENERATION_ROUNDS)]
        max_rounds: usize,

        /// Year randomized expiries are counted from (default: current year)
        #[arg(long)]
        reference_year: Option<i32>,
    },

    /// Check whether a number passes the Luhn checksum
    Validate {
        #[arg(short, long)]
        number: String,
    },

    /// Compute the check digit that completes a partial number
    CheckDigit {
        #[arg(short, long)]
        partial: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            pattern,
            count,
            seed,
            json,
            delimiter,
            max_rounds,
            reference_year,
        } => {
            let config = GeneratorConfig {
                delimiter,
                max_rounds,
                reference_year,
                ..Default::default()
            };
            handle_generate(config, pattern, count, seed, json)
        }
        Commands::Validate { number } => handle_validate(number),
        Commands::CheckDigit { partial } => handle_check_digit(partial),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn handle_generate(
    config: GeneratorConfig,
    pattern: String,
    count: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let count = count.unwrap_or(config.default_count);
    let generator = Generator::new(config)?;

    let batch = match seed {
        Some(seed) => generator.generate_batch_seeded(&pattern, count, seed)?,
        None => generator.generate_batch(&pattern, count)?,
    };

    if json {
        println!("{}", batch.to_json()?);
    } else {
        println!("{}", batch);
    }

    Ok(())
}

fn handle_validate(number: String) -> anyhow::Result<()> {
    if is_valid_number(&number) {
        println!("Valid: true");
    } else {
        println!("Valid: false");
        process::exit(1);
    }

    Ok(())
}

fn handle_check_digit(partial: String) -> anyhow::Result<()> {
    let digits = digits_from_str(&strip_non_digits(&partial))?;
    if digits.is_empty() {
        anyhow::bail!("partial number must contain at least one digit");
    }

    let check = luhn_check_digit(&digits);
    println!("Check Digit: {}", check);
    println!("Full Number: {}{}", strip_non_digits(&partial), check);

    Ok(())
}
