use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::access::AccessCommands;
use crate::commands::builds::BuildsCommands;
use crate::commands::config::ConfigCommands;
use crate::commands::org::OrgCommands;

#[derive(Parser)]
#[command(
    name = "ghops",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: ~/.config/ghops/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// GitHub Actions build monitoring
    #[command(subcommand)]
    Builds(BuildsCommands),

    /// GitHub API access diagnostics
    #[command(subcommand)]
    Access(AccessCommands),

    /// Organization management
    #[command(subcommand)]
    Org(OrgCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case::status(&["ghops", "builds", "status", "--repo", "dashboard", "--watch"])]
    #[case::status_limit(&["ghops", "builds", "status", "--limit", "100"])]
    #[case::trigger(&["ghops", "builds", "trigger", "dashboard", "ci.yml", "develop", r#"{"a":"b"}"#])]
    #[case::wait(&["ghops", "builds", "wait", "acme/api", "42", "--timeout", "60"])]
    #[case::adapt(&["ghops", "builds", "adapt", "dashboard", "--json"])]
    #[case::access(&["ghops", "access", "check"])]
    #[case::report(&["ghops", "org", "report", "--output", "out.json"])]
    #[case::professionalize(&["ghops", "org", "professionalize", "--readme", "README.md"])]
    #[case::global_config(&["ghops", "config", "show", "--config", "custom.yaml"])]
    #[case::completions(&["ghops", "completions", "zsh"])]
    fn parses(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[rstest]
    #[case::no_command(&["ghops"])]
    #[case::bad_run_id(&["ghops", "builds", "wait", "dashboard", "abc"])]
    #[case::unknown_org_command(&["ghops", "org", "delete-everything"])]
    #[case::zero_limit(&["ghops", "builds", "status", "--limit", "0"])]
    #[case::limit_above_page_size(&["ghops", "builds", "status", "--limit", "500"])]
    fn rejects(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn global_config_flag_is_captured() {
        let cli = Cli::try_parse_from(["ghops", "access", "check", "--config", "x.yaml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
        assert!(cli.command == Commands::Access(AccessCommands::Check));
    }
}
