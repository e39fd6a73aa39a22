//! fake-tokens CLI
//!
//! Generates fake tokens for testing (GitHub, GitLab, NPM, and AWS)

use anyhow::Result;
use clap::Parser;
use fake_tokens::{
    ConfigLoadOptions, ConfigLoader, DefaultsConfig, FormatValidator, GenerateOptions,
    OutputFormat, TokenError, TokenFormat, TokenGenerator, TokensConfig,
};
use log::{debug, warn};
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

const EXAMPLES: &str = "\
Examples:
  fake-tokens                          # Generate 1 GitHub classic token
  fake-tokens -c 5                     # Generate 5 GitHub classic tokens
  fake-tokens -t github_fine_grained   # Generate GitHub fine-grained token
  fake-tokens -t gitlab                # Generate GitLab token
  fake-tokens -t npm                   # Generate NPM token
  fake-tokens -t aws_access_key        # Generate AWS access key
  fake-tokens -t aws_secret_key        # Generate AWS secret key
  fake-tokens -c 3 -t aws_access_key   # Generate 3 AWS access keys";

/// Generate fake tokens for testing (GitHub, GitLab, NPM, and AWS)
#[derive(Parser)]
#[command(name = "fake-tokens")]
#[command(version)]
#[command(about = "Generate fake tokens for testing (GitHub, GitLab, NPM, and AWS)", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Number of tokens to generate (default: 1)
    #[arg(short, long, value_name = "N")]
    count: Option<usize>,

    /// Token type to generate (default: github_classic)
    #[arg(short = 't', long = "type", value_enum, value_name = "TYPE")]
    token_type: Option<TokenFormat>,

    /// Total length of github_fine_grained tokens (default: 93)
    #[arg(short, long, value_name = "N")]
    length: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Configuration file (defaults to ./.fake-tokens.yaml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log generator activity to stderr
    #[arg(short, long)]
    verbose: bool,

    /// List supported token types and exit
    #[arg(long, conflicts_with = "detect")]
    list_types: bool,

    /// Print the token type a string looks like and exit
    #[arg(long, value_name = "TOKEN")]
    detect: Option<String>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    #[serde(rename = "type")]
    token_type: TokenFormat,
    count: usize,
    tokens: &'a [String],
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            // stderr is best effort on the way out
            let _ = report_error(&e, &mut io::stderr().lock());
            process::exit(1);
        }
    }
}

fn report_error(error: &anyhow::Error, err: &mut impl Write) -> io::Result<()> {
    writeln!(err, "Error: {}", error)?;

    if let Some(token_error) = error.downcast_ref::<TokenError>() {
        let heading = if token_error.is_recoverable() {
            "Fix the input and try again:"
        } else {
            "Suggested actions:"
        };
        writeln!(err, "{}", heading)?;
        for action in token_error.suggested_actions() {
            writeln!(err, "  - {}", action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    if cli.list_types {
        return list_types_command();
    }

    if let Some(token) = &cli.detect {
        return detect_command(token, &mut io::stdout().lock(), &mut io::stderr().lock());
    }

    generate_command(cli)
}

fn generate_command(cli: Cli) -> Result<i32> {
    let cli_args = TokensConfig {
        version: String::new(),
        defaults: Some(DefaultsConfig {
            token_type: cli.token_type,
            count: cli.count,
            fine_grained_length: None,
            output: cli.output,
        }),
        generator: None,
    };

    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path: env::current_dir()?,
        config_file: cli.config,
        cli_args: Some(cli_args),
        env: ConfigLoader::env_from_os(env::vars_os()),
    })?;

    let validation = ConfigLoader::validate(&config);
    if !validation.valid {
        eprintln!("{}", ConfigLoader::format_validation_result(&validation));
        return Ok(1);
    }
    for warning in &validation.warnings {
        warn!("[{}] {}", warning.field, warning.message);
    }

    let settings = config.settings();
    debug!("resolved settings: {:?}", settings);

    // --length is checked by the generator, not by config validation, so it
    // only matters for github_fine_grained.
    let options = GenerateOptions::default()
        .with_total_length(cli.length.unwrap_or(settings.fine_grained_length));

    let generator = TokenGenerator::new().with_max_attempts(settings.max_attempts);
    let tokens = generator.generate_batch_with(settings.count, settings.token_type, &options)?;

    write_tokens(&mut io::stdout().lock(), settings.output, settings.token_type, &tokens)?;

    Ok(0)
}

fn write_tokens(
    out: &mut impl Write,
    output: OutputFormat,
    token_type: TokenFormat,
    tokens: &[String],
) -> Result<()> {
    match output {
        OutputFormat::Text => {
            for token in tokens {
                writeln!(out, "{}", token)?;
            }
        }
        OutputFormat::Json => {
            let batch = BatchOutput {
                token_type,
                count: tokens.len(),
                tokens,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&batch)?)?;
        }
    }

    Ok(())
}

fn list_types_command() -> Result<i32> {
    for format in TokenFormat::ALL {
        let shape = format.shape(None)?;
        let layout = if shape.prefix.is_empty() {
            format!("{} chars", shape.body_length)
        } else {
            format!("{} + {} chars", shape.prefix, shape.body_length)
        };
        println!(
            "{:<20} {:<22} {:<26} {}",
            format.as_str(),
            layout,
            shape.alphabet.name(),
            format.description()
        );
    }

    Ok(0)
}

fn detect_command(token: &str, out: &mut impl Write, err: &mut impl Write) -> Result<i32> {
    match FormatValidator::new().detect(token.trim()) {
        Some(format) => {
            writeln!(out, "{}", format)?;
            Ok(0)
        }
        None => {
            writeln!(err, "No known token format matches")?;
            Ok(1)
        }
    }
}
