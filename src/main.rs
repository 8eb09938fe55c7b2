use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_log::AsTrace;
use webry::{
    args::{Args, CheckArgs, Commands, ExportArgs},
    collections::{init_from_path, Collections},
    config::Config,
    error::SiteErr,
    fs::write_file,
};

fn load(path: &Path) -> Result<Collections, SiteErr> {
    let config = Config::try_from(path)?;
    info!(
        "site: {}, integrations: [{}]",
        config
            .site
            .as_ref()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "-".into()),
        config
            .integrations
            .iter()
            .map(|integration| integration.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );
    init_from_path(path, &config)
}

fn check(args: CheckArgs) -> Result<(), SiteErr> {
    let collections = load(&args.path)?;
    info!(
        "{} entries valid, {} published posts, {} tags",
        collections.len(),
        collections.published().count(),
        collections.tags().len()
    );
    Ok(())
}

fn export(args: ExportArgs) -> Result<(), SiteErr> {
    let collections = load(&args.path)?;
    let json = collections.to_json(args.pretty)?;
    match args.out {
        Some(out) => {
            write_file(&out, json.as_bytes())?;
            info!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<(), SiteErr> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.verbose.log_level_filter().as_trace())
        .init();

    match args.command {
        Some(Commands::Check(args)) => check(args),
        Some(Commands::Export(args)) => export(args),
        None => check(CheckArgs {
            path: args.path.unwrap_or_else(|| PathBuf::from(".")),
        }),
    }
}
