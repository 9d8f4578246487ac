use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use bvs_core::country::country_fq;
use bvs_core::normalize::normalize;
use bvs_core::query::{search_url, SearchQuery};
use bvs_core::tables::ResourceKind;
pub use bvs_core::output::{to_cards_output, to_search_output, SearchOutput};

use super::{load_config, report_error, EndpointOptions, OutputFormat};
use crate::client::{create_bvs_client, get_json, probe_connection};
use crate::config::BvsConfig;

/// Options for searching one resource kind
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
#[command(after_help = "EXAMPLES:
  # First page of journals about dengue:
  bvs journals search dengue

  # Legislation from two countries, as cards:
  bvs legislations search --country 'brasil, chile' --format cards

  # Every event in one request:
  bvs events search --all --format json")]
pub struct SearchOptions {
    /// Query string (defaults to match-all)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Country filter; comma-separated names are OR-ed
    #[arg(long)]
    pub country: Option<String>,

    /// Extra filter-query clause (repeatable, AND-ed)
    #[arg(long = "filter", value_name = "FQ")]
    pub filters: Vec<String>,

    /// Facet fields to request with the results (repeatable)
    #[arg(long = "facet", value_name = "FIELD")]
    pub facets: Vec<String>,

    /// Number of documents per page
    #[arg(short, long, env = "BVS_COUNT", default_value = "10")]
    pub count: u64,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u64,

    /// Disable pagination and fetch every match
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[clap(flatten)]
    pub endpoint: EndpointOptions,
}

impl SearchOptions {
    /// Upstream query for these options
    pub fn to_query(&self, kind: &ResourceKind) -> SearchQuery {
        let start = self.page.saturating_sub(1).saturating_mul(self.count);
        let mut query = SearchQuery::new(self.count, start)
            .with_query(self.query.clone().unwrap_or_default())
            .with_facets(self.facets.iter().cloned());

        if let Some(fq) = self
            .country
            .as_deref()
            .and_then(|input| country_fq(country_field(kind), input))
        {
            query = query.with_filter(fq);
        }

        self.filters
            .iter()
            .fold(query, |query, filter| query.with_filter(filter.clone()))
    }
}

/// Index field used for country filters: the first source of the kind's country field
pub fn country_field(kind: &ResourceKind) -> &'static str {
    kind.field_table()
        .rule("country")
        .and_then(|rule| rule.sources.first().copied())
        .unwrap_or("country")
}

pub async fn run(kind: ResourceKind, options: SearchOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global, &kind, &options.endpoint)?;
    let query = options.to_query(&kind);

    if global.verbose {
        eprintln!("Searching {kind} (count={}, start={})", query.count, query.start);
    }

    let output = match search_data(&kind, query, options.all, &config).await {
        Ok(output) => output,
        Err(e) => return report_error(e, options.format, &config),
    };

    if output.dropped > 0 && global.verbose {
        eprintln!("Dropped {} documents without title or id", output.dropped);
    }

    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Cards => println!(
            "{}",
            serde_json::to_string_pretty(&to_cards_output(&output, &config.language))?
        ),
        OutputFormat::Table => output_table(&output, &config.language),
    }

    Ok(())
}

/// Runs one search render and returns the mapped documents
///
/// Sequence: optional connectivity probe, then a `count=1` probe to learn the
/// total when `all` is set, then the real fetch. Primary results are never cached.
pub async fn search_data(
    kind: &ResourceKind,
    mut query: SearchQuery,
    all: bool,
    config: &BvsConfig,
) -> std::result::Result<SearchOutput, BvsError> {
    let endpoint = config.endpoint(kind)?;
    let client = create_bvs_client(config, &endpoint)?;

    if config.connectivity_probe {
        probe_connection(&client, &endpoint.base_url).await?;
    }

    if all {
        let probe = get_json(&client, &search_url(&endpoint.base_url, &query.count_probe())).await?;
        let total = normalize(probe).into_canonical().total;
        log::debug!("{kind}: {total} documents upstream");

        if total == 0 {
            return Ok(SearchOutput::empty(kind.clone(), 0));
        }
        query.count = total;
        query.start = 0;
    }

    let raw = get_json(&client, &search_url(&endpoint.base_url, &query)).await?;
    let normalized = normalize(raw);
    log::debug!("{kind}: envelope {:?}", normalized.shape());

    let output = to_search_output(kind, normalized.into_canonical());
    if output.dropped > 0 {
        log::debug!("{kind}: dropped {} invalid documents", output.dropped);
    }

    Ok(output)
}

fn output_table(output: &SearchOutput, lang: &str) {
    if output.is_empty() {
        println!("{}", "No results found.".yellow());
        return;
    }

    let layout = &output.kind.field_table().card;
    let mut table = new_table();

    let mut header = vec!["#".to_string(), "Title".to_string()];
    header.extend(layout.content.iter().map(|(label, _)| label.to_string()));
    table.add_row(prettytable::Row::new(
        header
            .iter()
            .map(|h| prettytable::Cell::new(h).style_spec("b"))
            .collect(),
    ));

    for (i, doc) in output.documents.iter().enumerate() {
        let mut cells = vec![
            output.start.saturating_add(i as u64 + 1).to_string(),
            doc.title().or(doc.id()).unwrap_or_default().to_string(),
        ];
        cells.extend(
            layout
                .content
                .iter()
                .map(|(_, field)| doc.formatted(field, lang).unwrap_or_default()),
        );
        table.add_row(prettytable::Row::new(
            cells.iter().map(|c| prettytable::Cell::new(c)).collect(),
        ));
    }

    table.printstd();

    println!(
        "\n{} of {} documents",
        output.documents.len().to_string().bright_cyan(),
        output.total.to_string().bright_cyan()
    );
}
