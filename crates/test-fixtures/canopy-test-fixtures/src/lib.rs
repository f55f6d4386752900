//! Shared JSON fixtures under `fixtures/`, looked up by name through
//! `fixtures/manifest.json`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Page {
    path: String,
    /// Triggers the registry should build for this page.
    #[serde(default)]
    triggers: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    markup: BTreeMap<String, Page>,
    content: BTreeMap<String, String>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures/manifest.json is valid")
});

fn fixture_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel)
}

/// Serialized pages: element trees with measured boxes and a viewport.
pub mod markup {
    use super::*;

    fn page(name: &str) -> Result<&'static Page> {
        CATALOG
            .markup
            .get(name)
            .with_context(|| format!("no markup fixture named `{name}`"))
    }

    /// Raw page JSON, ready for `StaticMarkup::from_json`.
    pub fn json(name: &str) -> Result<String> {
        let path = fixture_path(&page(name)?.path);
        std::fs::read_to_string(&path)
            .with_context(|| format!("reading markup fixture {}", path.display()))
    }

    pub fn expected_triggers(name: &str) -> Result<Option<usize>> {
        Ok(page(name)?.triggers)
    }
}

/// Content roots laid out as `<root>/<collection>/*.json`.
pub mod content {
    use super::*;

    pub fn root(name: &str) -> Result<PathBuf> {
        let rel = CATALOG
            .content
            .get(name)
            .with_context(|| format!("no content fixture named `{name}`"))?;
        Ok(fixture_path(rel))
    }
}
