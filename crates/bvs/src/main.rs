#![allow(unused)]

use crate::prelude::*;
use bvs_core::tables::ResourceKind;
use clap::Parser;
use std::path::PathBuf;

mod cache;
mod client;
mod config;
mod error;
mod prelude;
mod resources;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search the BVS journal, event, web resource, legislation, multimedia and database APIs"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Settings file (defaults to <config dir>/bvs/settings.toml)
    #[clap(long, env = "BVS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Preferred language for multilingual fields
    #[clap(long, global = true)]
    language: Option<String>,

    /// Per-request timeout in seconds
    #[clap(long, global = true)]
    timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[clap(long, global = true, default_value = "false")]
    insecure: bool,

    /// Skip the connectivity probe before searching
    #[clap(long, global = true, default_value = "false")]
    no_probe: bool,

    /// Whether to display additional information.
    #[clap(long, env = "BVS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Scientific journals
    Journals(crate::resources::App),

    /// Scientific events
    Events(crate::resources::App),

    /// Web resources (LIS)
    WebResources(crate::resources::App),

    /// Legislation and normative acts
    Legislations(crate::resources::App),

    /// Multimedia
    Multimedia(crate::resources::App),

    /// Bibliographic databases
    Databases(crate::resources::App),

    /// Resource list configured under an arbitrary name
    Resource(crate::resources::GenericApp),

    /// Facet cache maintenance
    Cache(crate::cache::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Journals(sub_app) => {
            crate::resources::run(ResourceKind::Journal, sub_app, app.global).await
        }
        SubCommands::Events(sub_app) => {
            crate::resources::run(ResourceKind::Event, sub_app, app.global).await
        }
        SubCommands::WebResources(sub_app) => {
            crate::resources::run(ResourceKind::WebResource, sub_app, app.global).await
        }
        SubCommands::Legislations(sub_app) => {
            crate::resources::run(ResourceKind::Legislation, sub_app, app.global).await
        }
        SubCommands::Multimedia(sub_app) => {
            crate::resources::run(ResourceKind::Multimedia, sub_app, app.global).await
        }
        SubCommands::Databases(sub_app) => {
            crate::resources::run(ResourceKind::BibliographicDatabase, sub_app, app.global).await
        }
        SubCommands::Resource(sub_app) => crate::resources::run_generic(sub_app, app.global).await,
        SubCommands::Cache(sub_app) => crate::cache::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
