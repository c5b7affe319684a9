//! Case-insensitive name search over a scanned tree.
//!
//! Every node whose name contains the query is counted towards the totals.
//! Only the largest `limit` matches are kept for display, so the totals can
//! exceed what the match list shows.

use std::collections::HashSet;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use dirscope_core::FileNode;

use crate::topk::TopK;

/// Default number of matches kept in a result.
pub const DEFAULT_LIMIT: usize = 200;

/// Configuration for a search.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct SearchConfig {
    /// Text to look for in node names. Empty matches nothing.
    pub query: String,

    /// Maximum number of matches to keep (0 = keep none, totals only).
    #[builder(default = "DEFAULT_LIMIT")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchConfig {
    /// Create a new config builder.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Search for `query` with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Same config with a different limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A matched node and its depth below the search root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchMatch<'a> {
    pub node: &'a FileNode,
    pub depth: usize,
}

impl SearchMatch<'_> {
    /// Size of the matched node.
    pub fn size(&self) -> u64 {
        self.node.size()
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult<'a> {
    /// Largest matches, size descending, at most `limit` long.
    pub matches: Vec<SearchMatch<'a>>,
    /// Number of matching nodes, including those not kept.
    pub total_match_count: u64,
    /// Combined size of all matching nodes.
    pub total_match_bytes: u64,
    /// Paths of all matching nodes.
    pub matched_paths: HashSet<&'a Path>,
    /// Whether the search was stopped before visiting every node.
    pub cancelled: bool,
}

impl SearchResult<'_> {
    /// Whether anything matched.
    pub fn has_matches(&self) -> bool {
        self.total_match_count > 0
    }

    /// Whether `path` matched, even if it did not make the top list.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.matched_paths.contains(path)
    }

    /// Number of matches left out of the top list.
    pub fn omitted_count(&self) -> u64 {
        self.total_match_count - self.matches.len() as u64
    }
}

/// Searches trees with a fixed configuration.
#[derive(Debug, Clone)]
pub struct TreeSearcher {
    config: SearchConfig,
}

impl TreeSearcher {
    /// Create a searcher with the given config.
    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Search `root` to completion.
    pub fn search<'a>(&self, root: &'a FileNode) -> SearchResult<'a> {
        search_with_cancel(root, &self.config, &CancellationToken::new())
    }

    /// Search `root`, stopping early if `cancel` fires.
    pub fn search_with_cancel<'a>(
        &self,
        root: &'a FileNode,
        cancel: &CancellationToken,
    ) -> SearchResult<'a> {
        search_with_cancel(root, &self.config, cancel)
    }
}

/// Find nodes under `root` (inclusive) whose name contains `query`,
/// ignoring case.
pub fn search<'a>(root: &'a FileNode, query: &str, limit: usize) -> SearchResult<'a> {
    let config = SearchConfig::new(query).with_limit(limit);
    search_with_cancel(root, &config, &CancellationToken::new())
}

/// Like [`search`], but checks `cancel` before each node and returns what
/// has been found so far once it fires.
pub fn search_with_cancel<'a>(
    root: &'a FileNode,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> SearchResult<'a> {
    search_until(root, config, || cancel.is_cancelled())
}

/// Core traversal. `should_stop` is polled before each node is visited.
pub(crate) fn search_until<'a>(
    root: &'a FileNode,
    config: &SearchConfig,
    mut should_stop: impl FnMut() -> bool,
) -> SearchResult<'a> {
    let mut result = SearchResult::default();
    if config.query.is_empty() {
        return result;
    }

    let needle = config.query.to_lowercase();
    let mut top = TopK::new(config.limit);
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if should_stop() {
            result.cancelled = true;
            break;
        }

        if node.is_dir() {
            stack.extend(node.children().iter().map(|child| (child, depth + 1)));
        }

        if !name_matches(node.name(), &needle) {
            continue;
        }

        result.total_match_count += 1;
        result.total_match_bytes += node.size();
        result.matched_paths.insert(node.path());
        top.push(node.size(), SearchMatch { node, depth });
    }

    debug!(
        query = %config.query,
        matches = result.total_match_count,
        kept = top.len(),
        cancelled = result.cancelled,
        "search finished"
    );

    result.matches = top.into_vec();
    result
}

/// `needle` must already be lowercase.
fn name_matches(name: &str, needle: &str) -> bool {
    if name.is_ascii() && needle.is_ascii() {
        return name
            .as_bytes()
            .windows(needle.len())
            .any(|w| w.eq_ignore_ascii_case(needle.as_bytes()));
    }
    name.to_lowercase().contains(needle)
}
