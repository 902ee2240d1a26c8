use clap::{Args, Parser, Subcommand, ValueEnum};
use redirgen_core::{Configuration, CoreError, StatusCode};
use redirgen_service::AddRedirect;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "REDIRGEN_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "REDIRGEN_MYSQL_DSN";
pub const SITES_ENV: &str = "REDIRGEN_SITES";

pub const DEFAULT_STATUS_CODE: u16 = 307;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    /// Ephemeral storage, nothing outlives the process
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "redirgen", version, about = "Manage entries of the redirects table")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add redirect to the redirects table
    #[command(
        alias = "redirect:add",
        after_help = "Add a single redirect from the given source url to the target url. \
                      Target URL must be a valid page!"
    )]
    Add(AddArgs),
    /// List all redirects of the redirects table
    List,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Source
    pub source: String,

    /// Target: a page id, a page link (t3://page?uid=42) or a page url
    pub target: String,

    /// Site configuration used to resolve the target
    #[arg(long, env = SITES_ENV)]
    pub sites: PathBuf,

    /// If this option is set, the redirect won't be added
    #[arg(long)]
    pub dry_run: bool,

    /// Define the status code, can be 301, 302, 303 or 307
    #[arg(long, visible_alias = "status", default_value_t = DEFAULT_STATUS_CODE)]
    pub status_code: u16,

    /// Overwrite existing source URL with the given target
    #[arg(long)]
    pub overwrite_existing: bool,

    /// Keep query parameters of the request when redirecting
    #[arg(long)]
    pub keep_query_parameters: bool,

    /// Treat the source path as a regular expression
    #[arg(long = "regexp")]
    pub is_regexp: bool,

    /// Redirect to https
    #[arg(long)]
    pub force_https: bool,

    /// Do not count hits of the redirect
    #[arg(long)]
    pub disable_hitcount: bool,

    /// Match query parameters of the source
    #[arg(long)]
    pub respect_query_parameters: bool,
}

impl AddArgs {
    pub fn configuration(&self) -> Result<Configuration, CoreError> {
        Ok(Configuration::builder()
            .overwrite_existing(self.overwrite_existing)
            .target_status_code(StatusCode::try_from(self.status_code)?)
            .keep_query_parameters(self.keep_query_parameters)
            .is_regexp(self.is_regexp)
            .force_https(self.force_https)
            .disable_hitcount(self.disable_hitcount)
            .respect_query_parameters(self.respect_query_parameters)
            .build())
    }

    pub fn into_request(self, configuration: Configuration) -> AddRedirect {
        AddRedirect {
            source: self.source,
            target: self.target,
            configuration,
            dry_run: self.dry_run,
        }
    }
}
