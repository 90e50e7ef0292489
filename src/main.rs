mod cli;

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cli::{check::cmd_check, classify_exit, run::cmd_run, SenderArgs};

#[derive(Parser)]
#[command(name = "udpbeat")]
#[command(about = "Periodic UDP heartbeat sender", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send heartbeats until interrupted (default)
    Run {
        #[command(flatten)]
        args: SenderArgs,

        /// Print the final send counters as JSON on clean shutdown
        #[arg(long)]
        summary: bool,
    },
    /// Validate configuration and resolve the destination without sending
    Check {
        #[command(flatten)]
        args: SenderArgs,
    },
    /// Show version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_format);

    let result = match cli.command {
        None => cmd_run(SenderArgs::default(), false).await,
        Some(Commands::Run { args, summary }) => cmd_run(args, summary).await,
        Some(Commands::Check { args }) => cmd_check(args).await,
        Some(Commands::Version) => {
            println!("udpbeat {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (kind, code) = classify_exit(&e);
            eprintln!("{}: {:#}", kind, e);
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "udpbeat", "run", "--host", "::1", "-p", "6000", "-i", "500ms", "--summary",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run { args, summary }) => {
                assert_eq!(args.host.as_deref(), Some("::1"));
                assert_eq!(args.port, Some(6000));
                assert_eq!(args.interval.as_deref(), Some("500ms"));
                assert!(summary);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_encoding_and_log_format() {
        let cli = Cli::try_parse_from([
            "udpbeat",
            "check",
            "--payload",
            "SGk=",
            "--encoding",
            "base64",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Some(Commands::Check { args }) => {
                assert_eq!(
                    args.encoding,
                    Some(udpbeat::config::PayloadEncoding::Base64)
                );
            }
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["udpbeat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_rejects_unknown_encoding() {
        assert!(Cli::try_parse_from(["udpbeat", "run", "--encoding", "rot13"]).is_err());
    }
}
