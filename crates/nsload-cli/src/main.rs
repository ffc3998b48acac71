//! nsload command-line tool
//!
//! Resolves package identifiers, loads modules from the configured
//! repositories and shows what they export.

mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use nsload::path::path_to_url;
use nsload::{
    find_config, ErrorLevel, Loader, LoaderConfig, ManifestFactory, ModuleHandle, NameList,
    UrlFetcher,
};
use output::StyledOutput;

#[derive(Parser)]
#[command(name = "nsload")]
#[command(about = "Load-once module loader for dotted namespaces", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Search this repository before the configured ones (repeatable)
    #[arg(short = 'r', long = "repo", global = true)]
    repos: Vec<String>,

    /// How load failures are surfaced: silent, warn or fatal
    #[arg(long, global = true)]
    error_level: Option<ErrorLevel>,

    /// Config file (default: nearest nsload.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory relative repositories are resolved against
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource path and candidate locations for identifiers
    Resolve {
        /// Package identifiers (e.g. Foo.Bar)
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Load a module and describe it
    Require {
        /// Package identifier
        id: String,
    },

    /// Load a module and export symbols into a fresh global scope
    Use {
        /// Package identifier
        id: String,
        /// Names or tags to import (default: the module's export list)
        imports: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let choice = output::color_choice();
    let mut out = StyledOutput::new(choice);

    let base_dir = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine working directory")?,
    };
    let mut loader = build_loader(&cli, &base_dir)?;
    loader.diagnostics_mut().set_notifier(move |message: &str| {
        StyledOutput::new(choice).warning(message);
    });

    match cli.command {
        Commands::Resolve { ids } => {
            for id in &ids {
                let path = loader.resolve_path(id);
                out.heading(id);
                out.field("path", &path);
                for repository in loader.repositories().iter() {
                    out.dim(&format!("    {}", path_to_url(repository, &path)));
                    out.newline();
                }
            }
        }

        Commands::Require { id } => {
            let handle = load(&mut loader, &id)?;
            describe(&mut out, &loader, &id, &handle);
        }

        Commands::Use { id, imports } => {
            let handle = load(&mut loader, &id)?;
            let requested: Vec<NameList> = if imports.is_empty() {
                Vec::new()
            } else {
                vec![NameList::list(&imports)]
            };
            let exported = loader.exporter(&handle, &requested);

            out.heading(&format!("use {}", handle.name()));
            if exported.is_empty() {
                out.dim("  (nothing exported)");
                out.newline();
            }
            for name in &exported {
                if let Some(value) = loader.global_scope().get(name) {
                    out.field(name, &value.to_string());
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "nsload=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli, base_dir: &Path) -> anyhow::Result<LoaderConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => find_config(base_dir),
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using config");
            LoaderConfig::from_file(&path)
                .with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(LoaderConfig::default()),
    }
}

fn build_loader(cli: &Cli, base_dir: &Path) -> anyhow::Result<Loader> {
    let mut config = load_config(cli, base_dir)?;
    if let Some(level) = cli.error_level {
        config.error_level = level;
    }

    let fetcher = UrlFetcher::new(base_dir)?;
    let mut loader = Loader::from_config(&config, fetcher, ManifestFactory);
    if !cli.repos.is_empty() {
        loader.add_repository(NameList::list(&cli.repos));
    }
    Ok(loader)
}

fn load(loader: &mut Loader, id: &str) -> anyhow::Result<ModuleHandle> {
    match loader.require(id)? {
        Some(handle) => Ok(handle),
        None => bail!(
            "{}",
            loader.last_error().unwrap_or("module did not load").to_string()
        ),
    }
}

fn describe(out: &mut StyledOutput, loader: &Loader, id: &str, handle: &ModuleHandle) {
    out.heading(handle.name());

    match loader.cache().entry(&loader.resolve_path(id)) {
        Some(cached) => {
            out.field("url", &cached.url);
            out.field("sha256", &cached.checksum);
        }
        None => out.field("url", "(defined in global scope)"),
    }

    let exports = handle.exports();
    out.field("export", &exports.export.join(", "));
    out.field("export_ok", &exports.export_ok.join(", "));
    for (tag, names) in &exports.export_tags {
        out.field(tag, &names.join(", "));
    }
    out.field("members", &handle.members().names().join(", "));
    if handle.constructor().is_some() {
        out.success("  callable");
        out.newline();
    }
}
