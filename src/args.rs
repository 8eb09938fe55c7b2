use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Project directory checked when no subcommand is given.
    pub path: Option<PathBuf>,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        name = "check",
        about = "Validate every content collection. [default]"
    )]
    Check(CheckArgs),
    #[command(
        name = "export",
        about = "Validate content and write the normalized collections as JSON."
    )]
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Path to the project directory.
    #[clap(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Path to the project directory.
    #[clap(default_value = ".")]
    pub path: PathBuf,
    /// Write to this file instead of stdout.
    #[clap(short, long)]
    pub out: Option<PathBuf>,
    #[clap(long, action)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn export_args() {
        let args = Args::parse_from(["webry", "export", "site", "--out", "dist/content.json"]);
        match args.command {
            Some(Commands::Export(export)) => {
                assert_eq!(export.path, PathBuf::from("site"));
                assert_eq!(export.out, Some(PathBuf::from("dist/content.json")));
                assert!(!export.pretty);
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn no_subcommand() {
        let args = Args::parse_from(["webry", "-v"]);
        assert!(args.command.is_none());
        assert!(args.path.is_none());
    }

    #[test]
    fn path_without_subcommand() {
        let args = Args::parse_from(["webry", "./site"]);
        assert!(args.command.is_none());
        assert_eq!(args.path, Some(PathBuf::from("./site")));
    }

    #[test]
    fn subcommand_name_wins_over_path() {
        let args = Args::parse_from(["webry", "check", "./site"]);
        match args.command {
            Some(Commands::Check(check)) => assert_eq!(check.path, PathBuf::from("./site")),
            other => panic!("expected check, got {other:?}"),
        }
        assert!(args.path.is_none());
    }
}
