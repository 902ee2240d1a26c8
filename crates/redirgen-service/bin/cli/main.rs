mod cli;
mod exit;

use crate::cli::{AddArgs, Command, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use redirgen_core::Repository;
use redirgen_resolver::SiteResolver;
use redirgen_service::{report, CommandError, RedirectGenerator, RedirectStore};
use redirgen_storage::{InMemoryRepository, MySqlRepository};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(storage_backend = %config.storage, "starting redirgen");

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            eprint!("{}", report::error_block(&format!("{e:#}")));
            ExitCode::from(exit::FAILURE)
        }
    }
}

async fn run(config: CLI) -> anyhow::Result<ExitCode> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(dispatch(config.command, InMemoryRepository::new()).await),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(&mysql_dsn)
                .await
                .context("cannot connect to the redirects database")?;
            Ok(dispatch(config.command, repository).await)
        }
    }
}

async fn dispatch<R: Repository>(command: Command, repository: R) -> ExitCode {
    let store = RedirectStore::with_system_clock(repository);
    match command {
        Command::Add(args) => add(args, store).await,
        Command::List => list(store).await,
    }
}

async fn add<R: Repository>(args: AddArgs, store: RedirectStore<R>) -> ExitCode {
    print!("{}", report::title(report::ADD_TITLE));
    if args.dry_run {
        print!("{}", report::dry_run_warning());
    }

    let configuration = match args.configuration() {
        Ok(configuration) => configuration,
        Err(e) => return fail(&e.into()),
    };
    let resolver = match SiteResolver::from_path(&args.sites) {
        Ok(resolver) => resolver,
        Err(e) => return fail(&e.into()),
    };

    let generator = RedirectGenerator::new(resolver, store);
    match generator.add(args.into_request(configuration)).await {
        Ok(summary) => {
            print!("{}", report::render_add_report(&summary));
            ExitCode::from(exit::for_outcome(&summary.outcome))
        }
        Err(e) => fail(&e),
    }
}

async fn list<R: Repository>(store: RedirectStore<R>) -> ExitCode {
    print!("{}", report::title(report::LIST_TITLE));
    match store.list_all().await {
        Ok(redirects) => {
            print!("{}", report::render_redirects(&redirects));
            ExitCode::from(exit::SUCCESS)
        }
        Err(e) => fail(&e.into()),
    }
}

fn fail(error: &CommandError) -> ExitCode {
    eprint!("{}", report::render_error(error));
    ExitCode::from(exit::for_error(error))
}
