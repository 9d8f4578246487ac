use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use bvs_core::normalize::normalize;
use bvs_core::output::{label_facets, FacetLabel};
use bvs_core::query::{cache_key, search_url, SearchQuery};
use bvs_core::tables::ResourceKind;

use super::{load_config, report_error, EndpointOptions, OutputFormat};
use crate::cache::{cache_dir, remember};
use crate::client::{create_bvs_client, get_json};
use crate::config::BvsConfig;

/// Options for listing facet histograms
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct FacetOptions {
    /// Facet field (repeatable)
    #[arg(long = "field", value_name = "FIELD", required = true)]
    pub fields: Vec<String>,

    /// Restrict the histogram to documents matching this query
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Output format (`cards` prints the same as `json`)
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[clap(flatten)]
    pub endpoint: EndpointOptions,
}

pub async fn run(kind: ResourceKind, options: FacetOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global, &kind, &options.endpoint)?;
    let dir = cache_dir()?;

    if global.verbose {
        eprintln!("Facets {} (cache: {})", options.fields.join(","), dir.display());
    }

    let query = SearchQuery::new(0, 0)
        .with_query(options.query.clone().unwrap_or_default())
        .with_facets(options.fields.iter().cloned());

    let facets = match facets_data(&kind, query, &config, &dir).await {
        Ok(facets) => facets,
        Err(e) => return report_error(e, options.format, &config),
    };

    match options.format {
        OutputFormat::Json | OutputFormat::Cards => {
            println!("{}", serde_json::to_string_pretty(&facets)?)
        }
        OutputFormat::Table => output_table(&facets),
    }

    Ok(())
}

/// Facet buckets for `query`, labelled for the configured language
///
/// The raw upstream response is kept in the file cache for `cache_ttl_secs`,
/// keyed by the request URL.
pub async fn facets_data(
    kind: &ResourceKind,
    query: SearchQuery,
    config: &BvsConfig,
    cache_dir: &Path,
) -> std::result::Result<BTreeMap<String, Vec<FacetLabel>>, BvsError> {
    let endpoint = config.endpoint(kind)?;
    let url = search_url(&endpoint.base_url, &query);
    let key = cache_key(&url);

    let client = create_bvs_client(config, &endpoint)?;

    let raw = remember(cache_dir, &key, config.cache_ttl_secs, || {
        get_json(&client, &url)
    })
    .await?;

    let result = normalize(raw).into_canonical();
    Ok(label_facets(&result.facets, &config.language))
}

fn output_table(facets: &BTreeMap<String, Vec<FacetLabel>>) {
    for (field, buckets) in facets {
        println!("{}", field.bold().bright_cyan());

        if buckets.is_empty() {
            println!("  {}", "(empty)".dimmed());
            continue;
        }

        let mut table = new_table();
        for bucket in buckets {
            table.add_row(prettytable::row![bucket.label, bucket.count]);
        }
        table.printstd();
        println!();
    }
}
