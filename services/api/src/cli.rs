use crate::demo::{run_demo, run_match, DemoArgs, MatchArgs};
use crate::server;
use agevo_match::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AGEVO MATCH",
    about = "Match Italian SMEs with public funding calls (bandi) from the command line",
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
    /// Score the grant catalog for a single company profile
    Match(MatchArgs),
    /// Run the sample catalog against a sample company
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agevo_match::matching::{CompanySize, InvestmentGoal, Region, Sector};

    #[test]
    fn match_command_parses_wire_values() {
        let cli = Cli::try_parse_from([
            "agevo-match",
            "match",
            "--sector",
            "tech",
            "--region",
            "emilia-romagna",
            "--size",
            "small",
            "--goal",
            "green",
            "--today",
            "2026-10-16",
            "--report",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Match(args)) => {
                assert_eq!(args.sector, Sector::Tech);
                assert_eq!(args.region, Region::EmiliaRomagna);
                assert_eq!(args.size, CompanySize::Small);
                assert_eq!(args.goal, InvestmentGoal::Green);
                assert!(args.report);
                assert!(args.catalog.is_none());
            }
            other => panic!("expected match command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_sector_is_rejected() {
        let result = Cli::try_parse_from([
            "agevo-match",
            "match",
            "--sector",
            "mining",
            "--region",
            "lazio",
            "--size",
            "small",
            "--goal",
            "green",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["agevo-match"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
