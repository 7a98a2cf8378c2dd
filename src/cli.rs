//! Command-line arguments and query-string helpers.
//!
//! `elog-client [CONFIG] [QUERY] [PAGES]`

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

use elog_core::feed::query_string::from_query_pairs;
use elog_core::{EntryId, EntrySummary, FilterState};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(version, about = "Print the logbook entry feed")]
pub struct CliArgs {
    /// Config file; `-` or an empty value falls back to `ELOG_CONFIG` or the
    /// default location.
    #[arg(value_name = "CONFIG", value_parser = parse_config_path)]
    pub config_path: Option<ConfigPath>,

    /// Filters as a URL query string, e.g. `logbooks=L1&spotlight=E9`.
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Number of pages to load.
    #[arg(
        value_name = "PAGES",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub pages: u32,
}

/// Config argument after `-` / empty handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPath {
    Default,
    File(PathBuf),
}

fn parse_config_path(raw: &str) -> Result<ConfigPath, String> {
    Ok(match raw.trim() {
        "" | "-" => ConfigPath::Default,
        path => ConfigPath::File(PathBuf::from(path)),
    })
}

impl CliArgs {
    /// Explicit config file, if one was named.
    pub fn config_file(&self) -> Option<PathBuf> {
        match &self.config_path {
            Some(ConfigPath::File(path)) => Some(path.clone()),
            Some(ConfigPath::Default) | None => None,
        }
    }
}

fn parse_query(query: &str) -> Option<Url> {
    let query = query.trim_start_matches('?');
    Url::parse(&format!("elog:/?{query}"))
        .inspect_err(|e| tracing::warn!(query, error = %e, "unparsable query string"))
        .ok()
}

/// FilterState from a query string, with or without the leading `?`.
pub fn filters_from_query(query: &str) -> FilterState {
    parse_query(query)
        .map(|url| from_query_pairs(url.query_pairs()))
        .unwrap_or_default()
}

/// Entry to reveal, from a `spotlight=<id>` parameter.
pub fn spotlight_from_query(query: &str) -> Option<EntryId> {
    parse_query(query)?
        .query_pairs()
        .find(|(key, value)| key == "spotlight" && !value.is_empty())
        .map(|(_, value)| EntryId::from(value.into_owned()))
}

/// Percent-encoded `key=value&...`; empty for no pairs.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut url = match Url::parse("elog:/") {
        Ok(url) => url,
        Err(_) => return String::new(),
    };
    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    url.query().unwrap_or_default().to_string()
}

/// One printed feed line; the requested spotlight is marked with `>`
/// whether it came from a context window or the first page.
pub fn entry_line(entry: &EntrySummary, spotlight: Option<&EntryId>) -> String {
    let marker = if spotlight == Some(&entry.id) { ">" } else { " " };
    format!(
        "{marker} {}  {:<12} {:<10} {}",
        entry.event_at, entry.id, entry.logbook_id, entry.title
    )
}
