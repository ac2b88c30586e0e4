use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "gitrisk",
    version,
    about = "Security risk scanner for remote GitHub repositories",
    long_about = "gitrisk inspects a remote GitHub repository for vulnerable dependency \
declarations and risky code patterns (hardcoded secrets, dangerous calls) and reports \
structured findings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Full audit: traverse, resolve, audit and persist findings
    Scan {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format for the terminal
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,

        /// Findings file, overwritten on each run
        #[arg(short, long, default_value = "scan_results.json")]
        output: PathBuf,
    },
    /// Quick scan: traverse and audit, print-only, no persistence
    List {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Target repository (owner/repo)
    pub repo: String,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Traversal policy file
    #[arg(long, default_value = "policy.json")]
    pub policy: PathBuf,

    /// Signature definitions file
    #[arg(long, default_value = "signatures.json")]
    pub signatures: PathBuf,

    /// Worker pool size for resolve + audit
    #[arg(short, long, default_value_t = 4)]
    pub jobs: usize,

    /// Overall scan timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scan_defaults() {
        let cli = Cli::try_parse_from(["gitrisk", "scan", "owner/repo"]).unwrap();
        match cli.command {
            Command::Scan {
                target,
                format,
                output,
            } => {
                assert_eq!(target.repo, "owner/repo");
                assert_eq!(target.jobs, 4);
                assert_eq!(target.policy, PathBuf::from("policy.json"));
                assert_eq!(target.signatures, PathBuf::from("signatures.json"));
                assert!(target.timeout.is_none());
                assert!(matches!(format, OutputFormat::Terminal));
                assert_eq!(output, PathBuf::from("scan_results.json"));
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["gitrisk", "list", "owner/repo", "--jobs", "8"]).unwrap();
        match cli.command {
            Command::List { target } => {
                assert_eq!(target.repo, "owner/repo");
                assert_eq!(target.jobs, 8);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_parse_scan_options() {
        let cli = Cli::try_parse_from([
            "gitrisk",
            "scan",
            "owner/repo",
            "--token",
            "ghp_x",
            "--policy",
            "custom/policy.json",
            "--timeout",
            "120",
            "--format",
            "json",
            "--output",
            "out.json",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Scan {
                target,
                format,
                output,
            } => {
                assert_eq!(target.token.as_deref(), Some("ghp_x"));
                assert_eq!(target.policy, PathBuf::from("custom/policy.json"));
                assert_eq!(target.timeout, Some(120));
                assert!(matches!(format, OutputFormat::Json));
                assert_eq!(output, PathBuf::from("out.json"));
            }
            _ => panic!("expected scan command"),
        }
    }

    #[test]
    fn test_repo_required() {
        assert!(Cli::try_parse_from(["gitrisk", "scan"]).is_err());
    }
}
