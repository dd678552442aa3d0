//! Provider that serves canned routes from JSON files.
//!
//! Useful for development and testing without provider credentials. Each
//! file `{name}.json` becomes one provider called `name` and holds a list of
//! origin/destination pairs with the raw routes to return for them.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::error::ProviderError;
use super::source::{RouteProvider, RouteQuery};
use super::types::RawProviderRoute;

/// Routes served for one origin/destination pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureEntry {
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub routes: Vec<RawProviderRoute>,
}

/// A provider backed by fixture entries.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    name: String,
    entries: Vec<FixtureEntry>,
}

impl FixtureProvider {
    /// Create a provider from in-memory entries.
    pub fn new(name: impl Into<String>, entries: Vec<FixtureEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Load a provider from a single JSON file; the file stem is its name.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ProviderError::InvalidPayload {
                message: format!("invalid fixture filename: {}", path.display()),
            })?;

        let json = std::fs::read_to_string(path)?;
        let entries: Vec<FixtureEntry> =
            serde_json::from_str(&json).map_err(|e| ProviderError::InvalidPayload {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        Ok(Self::new(name, entries))
    }

    /// Load one provider per `.json` file in `dir`, sorted by file name so
    /// provider order is stable.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<Self>, ProviderError> {
        let dir = dir.as_ref();

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(Self::from_file).collect()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[async_trait]
impl RouteProvider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        !self.entries.is_empty()
    }

    async fn fetch_routes(
        &self,
        query: &RouteQuery,
    ) -> Result<Vec<RawProviderRoute>, ProviderError> {
        let routes = self
            .entries
            .iter()
            .find(|e| same_place(&e.origin, &query.origin) && same_place(&e.destination, &query.destination))
            .map(|e| e.routes.clone())
            .unwrap_or_default();

        Ok(routes)
    }
}

fn same_place(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
