use crate::demo::{run_allocate, run_demo, run_market, AllocateArgs, DemoArgs, MarketArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use talent_market::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent Marketplace",
    about = "Browse, allocate, and reserve marketplace candidates from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Split a hiring need between current and sponsored candidates
    Allocate(AllocateArgs),
    /// Print per-program supply and any talent gap
    Market(MarketArgs),
    /// Walk a bulk and an individual reservation through to confirmation
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the candidate pool from a roster CSV instead of generating it
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Allocate(args) => run_allocate(args),
        Command::Market(args) => run_market(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["talent-market-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn allocate_requires_a_need() {
        assert!(Cli::try_parse_from(["talent-market-api", "allocate"]).is_err());
        let cli = Cli::try_parse_from([
            "talent-market-api",
            "allocate",
            "--needed",
            "10",
            "--available",
            "3",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Allocate(args)) => {
                assert_eq!(args.needed, 10);
                assert_eq!(args.available, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn demo_accepts_a_reporting_date() {
        let cli = Cli::try_parse_from(["talent-market-api", "demo", "--today", "2026-10-19"])
            .expect("parses");
        assert!(matches!(cli.command, Some(Command::Demo(_))));
        assert!(Cli::try_parse_from(["talent-market-api", "demo", "--today", "soon"]).is_err());
    }
}
