use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "casebrief")]
#[command(
    author,
    version,
    about = "Rule-based risk and category analysis for legal documents"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service
    Serve(ServeArgs),

    /// Analyze a local text file and print the result as JSON
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Rules file, overriding the one named in the configuration
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Text file to analyze
    pub file: PathBuf,

    /// Rules file (built-in rules when omitted)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How `analyze` prints its result
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON document
    Json,
    /// Human-readable report
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::parse_from(["casebrief", "serve"]);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, "config.yaml");
                assert!(args.listen.is_none());
                assert!(args.port.is_none());
                assert!(!args.verbose);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_args() {
        let cli = Cli::parse_from(["casebrief", "analyze", "brief.txt", "--pretty"]);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.file, PathBuf::from("brief.txt"));
                assert!(args.pretty);
                assert!(args.rules.is_none());
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_text_format() {
        let cli = Cli::parse_from(["casebrief", "analyze", "brief.txt", "--format", "text"]);
        match cli.command {
            Commands::Analyze(args) => assert_eq!(args.format, OutputFormat::Text),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
