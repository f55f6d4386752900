//! Collections on disk and the validated site content.
//!
//! Layout: `<root>/<collection>/<slug>.json`. A missing collection directory is
//! an empty collection; any unreadable, unparsable or invalid entry aborts the
//! whole load.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::ContentError;
use crate::fields::FromFields;
use crate::schema::{
    FaqSection, HeroSection, HowSection, PricingSection, ProcessSection, RegulationsSection,
    Section, WhySection,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Hero,
    Why,
    How,
    Process,
    Pricing,
    Faq,
    Regulations,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Hero,
        Collection::Why,
        Collection::How,
        Collection::Process,
        Collection::Pricing,
        Collection::Faq,
        Collection::Regulations,
    ];

    /// Directory name under the content root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Why => "why",
            Self::How => "how",
            Self::Process => "process",
            Self::Pricing => "pricing",
            Self::Faq => "faq",
            Self::Regulations => "regulations",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One validated record with the file stem it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry<T> {
    pub slug: String,
    pub data: T,
}

/// Validate one raw entry of `collection`.
pub fn parse_entry<T: FromFields>(
    collection: Collection,
    slug: &str,
    value: &Value,
) -> Result<Entry<T>, ContentError> {
    let data = T::from_value(value)
        .map_err(|err| ContentError::invalid(collection.dir_name(), slug, err))?;
    Ok(Entry {
        slug: slug.to_string(),
        data,
    })
}

/// Every validated collection, each sorted by `order` (ties keep file-name
/// order).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SiteContent {
    pub hero: Vec<Entry<HeroSection>>,
    pub why: Vec<Entry<WhySection>>,
    pub how: Vec<Entry<HowSection>>,
    pub process: Vec<Entry<ProcessSection>>,
    pub pricing: Vec<Entry<PricingSection>>,
    pub faq: Vec<Entry<FaqSection>>,
    pub regulations: Vec<Entry<RegulationsSection>>,
}

/// Entries with `visible = true`, in order.
pub fn visible<T: Section>(entries: &[Entry<T>]) -> Vec<&Entry<T>> {
    entries.iter().filter(|e| e.data.base().visible).collect()
}

impl SiteContent {
    pub fn visible_hero(&self) -> Vec<&Entry<HeroSection>> {
        visible(&self.hero)
    }

    pub fn visible_why(&self) -> Vec<&Entry<WhySection>> {
        visible(&self.why)
    }

    pub fn visible_how(&self) -> Vec<&Entry<HowSection>> {
        visible(&self.how)
    }

    pub fn visible_process(&self) -> Vec<&Entry<ProcessSection>> {
        visible(&self.process)
    }

    pub fn visible_pricing(&self) -> Vec<&Entry<PricingSection>> {
        visible(&self.pricing)
    }

    pub fn visible_faq(&self) -> Vec<&Entry<FaqSection>> {
        visible(&self.faq)
    }

    pub fn visible_regulations(&self) -> Vec<&Entry<RegulationsSection>> {
        visible(&self.regulations)
    }

    /// Number of entries per collection, in [`Collection::ALL`] order.
    pub fn counts(&self) -> [(Collection, usize); 7] {
        [
            (Collection::Hero, self.hero.len()),
            (Collection::Why, self.why.len()),
            (Collection::How, self.how.len()),
            (Collection::Process, self.process.len()),
            (Collection::Pricing, self.pricing.len()),
            (Collection::Faq, self.faq.len()),
            (Collection::Regulations, self.regulations.len()),
        ]
    }
}

/// Read and validate every collection under `root`.
pub fn load_site(root: &Path) -> Result<SiteContent, ContentError> {
    let site = SiteContent {
        hero: load_collection(root, Collection::Hero)?,
        why: load_collection(root, Collection::Why)?,
        how: load_collection(root, Collection::How)?,
        process: load_collection(root, Collection::Process)?,
        pricing: load_collection(root, Collection::Pricing)?,
        faq: load_collection(root, Collection::Faq)?,
        regulations: load_collection(root, Collection::Regulations)?,
    };
    log::debug!("loaded site content from {}: {:?}", root.display(), site.counts());
    Ok(site)
}

/// Read, validate and sort one collection directory.
pub fn load_collection<T>(
    root: &Path,
    collection: Collection,
) -> Result<Vec<Entry<T>>, ContentError>
where
    T: FromFields + Section,
{
    let dir = root.join(collection.dir_name());
    if !dir.is_dir() {
        log::debug!("no {collection} collection at {}", dir.display());
        return Ok(Vec::new());
    }
    let mut entries: Vec<Entry<T>> = Vec::new();
    for (slug, path) in entry_files(&dir)? {
        let text = fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| ContentError::Parse {
            path: path.clone(),
            source,
        })?;
        entries.push(parse_entry(collection, &slug, &value)?);
    }
    entries.sort_by(|a, b| a.data.base().order.total_cmp(&b.data.base().order));
    Ok(entries)
}

/// `*.json` files of `dir` as `(slug, path)`, sorted by file name.
fn entry_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, ContentError> {
    let io_err = |source| ContentError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for item in fs::read_dir(dir).map_err(io_err)? {
        let path = item.map_err(io_err)?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.push((stem.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_entry_reports_collection_and_slug() {
        let err = parse_entry::<FaqSection>(
            Collection::Faq,
            "general",
            &json!({ "title": "FAQ", "questions": [{ "question": "Why?" }] }),
        )
        .err()
        .unwrap();
        assert_eq!(err.field(), Some("questions[0].answer"));
        assert_eq!(
            err.to_string(),
            "faq/general: invalid field `questions[0].answer`: required"
        );
    }

    #[test]
    fn visible_filters_hidden_entries() {
        let shown =
            parse_entry::<HowSection>(Collection::How, "a", &json!({ "title": "A" })).unwrap();
        let hidden = parse_entry::<HowSection>(
            Collection::How,
            "b",
            &json!({ "title": "B", "visible": false }),
        )
        .unwrap();
        let entries = vec![shown, hidden];
        let v = visible(&entries);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].slug, "a");
    }
}
