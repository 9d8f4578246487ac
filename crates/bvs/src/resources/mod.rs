use crate::config::BvsConfig;
use crate::prelude::{eprintln, println, *};
use bvs_core::tables::ResourceKind;

pub mod facets;
pub mod search;

pub use facets::facets_data;
pub use search::search_data;

#[derive(Debug, clap::Parser)]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arbitrary-named resource list from the settings store
#[derive(Debug, clap::Parser)]
pub struct GenericApp {
    /// Settings key of the resource list
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Search the resource and print the mapped documents
    #[clap(name = "search")]
    Search(search::SearchOptions),

    /// Facet histograms (cached)
    #[clap(name = "facets")]
    Facets(facets::FacetOptions),
}

/// Per-invocation endpoint overrides
#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct EndpointOptions {
    /// Base URL of the resource API (overrides settings and BVS_<KEY>_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// API token sent in the `apikey` header
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Cards,
}

pub async fn run(kind: ResourceKind, app: App, global: crate::Global) -> Result<()> {
    dispatch(kind, app.command, global).await
}

pub async fn run_generic(app: GenericApp, global: crate::Global) -> Result<()> {
    dispatch(ResourceKind::Generic(app.name), app.command, global).await
}

async fn dispatch(kind: ResourceKind, command: Commands, global: crate::Global) -> Result<()> {
    if global.verbose {
        eprintln!("Resource: {kind}");
    }

    match command {
        Commands::Search(options) => search::run(kind, options, global).await,
        Commands::Facets(options) => facets::run(kind, options, global).await,
    }
}

/// Settings for one command: file and environment, then global and per-command flags
pub fn load_config(
    global: &crate::Global,
    kind: &ResourceKind,
    endpoint: &EndpointOptions,
) -> Result<BvsConfig> {
    let mut config = BvsConfig::load(global.config.as_deref())?;

    if let Some(language) = &global.language {
        config.language = language.clone();
    }
    if let Some(timeout) = global.timeout {
        config.timeout_secs = timeout;
    }
    if global.insecure {
        config.verify_tls = false;
    }
    if global.no_probe {
        config.connectivity_probe = false;
    }

    Ok(config.with_overrides(kind, endpoint.base_url.clone(), endpoint.api_key.clone()))
}

/// Print a failed render
///
/// Machine-readable formats get the `{error, kind, notice}` marker on stdout so
/// the caller can show it inline; the table format fails the command.
pub fn report_error(error: BvsError, format: OutputFormat, config: &BvsConfig) -> Result<()> {
    match format {
        OutputFormat::Table => Err(eyre!(error)),
        OutputFormat::Json | OutputFormat::Cards => {
            let marker = serde_json::json!({
                "error": error.to_string(),
                "kind": error.kind(),
                "notice": bvs_core::card::error_notice(&error, config.settings_url.as_deref()),
            });
            println!("{}", serde_json::to_string_pretty(&marker)?);
            Ok(())
        }
    }
}
