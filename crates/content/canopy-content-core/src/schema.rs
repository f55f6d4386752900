//! Section records for each collection.
//!
//! Every section shares [`SectionBase`]; collection types add their own lists.
//! Records serialize in camelCase for page templates.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::fields::{Fields, FromFields};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Light,
    Dark,
    Mist,
    Forest,
    Transparent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl FromFields for Image {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            src: f.required("src")?,
            alt: f.optional("alt")?,
            caption: f.optional("caption")?,
        })
    }
}

/// Fields common to every section.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBase {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub order: f64,
    pub visible: bool,
    pub background: Background,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
}

impl FromFields for SectionBase {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            title: f.required("title")?,
            subtitle: f.optional("subtitle")?,
            order: f.or_default("order", 0.0)?,
            visible: f.or_default("visible", true)?,
            background: f.or_default("background", Background::default())?,
            images: f.records("images")?,
        })
    }
}

/// Access to the shared base of any section record.
pub trait Section {
    fn base(&self) -> &SectionBase;
}

macro_rules! section {
    ($ty:ident) => {
        impl Section for $ty {
            fn base(&self) -> &SectionBase {
                &self.base
            }
        }
    };
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
}

impl FromFields for HeroSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            background_image: f.optional("backgroundImage")?,
            cta_text: f.optional("ctaText")?,
            cta_href: f.optional("ctaHref")?,
        })
    }
}

/// Titled card with an optional icon name; used by the rationale and
/// approach sections.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl FromFields for Card {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            title: f.required("title")?,
            description: f.required("description")?,
            icon: f.optional("icon")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhySection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain_points: Option<Vec<Card>>,
}

impl FromFields for WhySection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            pain_points: f.records("painPoints")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HowSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approaches: Option<Vec<Card>>,
}

impl FromFields for HowSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            approaches: f.records("approaches")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub number: f64,
    pub title: String,
    pub description: String,
}

impl FromFields for Step {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            number: f.required("number")?,
            title: f.required("title")?,
            description: f.required("description")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl FromFields for ProcessSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            steps: f.records("steps")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub name: String,
    /// Display string, e.g. `"from 1 200 EUR"`.
    pub price: String,
    pub description: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
}

impl FromFields for Package {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: f.required("name")?,
            price: f.required("price")?,
            description: f.required("description")?,
            features: f.required("features")?,
            highlighted: f.optional("highlighted")?,
            cta_text: f.optional("ctaText")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<Vec<Package>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FromFields for PricingSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            packages: f.records("packages")?,
            note: f.optional("note")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

impl FromFields for Question {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            question: f.required("question")?,
            answer: f.required("answer")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FaqSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

impl FromFields for FaqSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            questions: f.records("questions")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Clause {
    pub title: String,
    pub content: String,
}

impl FromFields for Clause {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            title: f.required("title")?,
            content: f.required("content")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegulationsSection {
    #[serde(flatten)]
    pub base: SectionBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Clause>>,
}

impl FromFields for RegulationsSection {
    fn from_fields(f: &Fields<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            base: SectionBase::from_fields(f)?,
            sections: f.records("sections")?,
        })
    }
}

section!(HeroSection);
section!(WhySection);
section!(HowSection);
section!(ProcessSection);
section!(PricingSection);
section!(FaqSection);
section!(RegulationsSection);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_base_fields_take_defaults() {
        let s = WhySection::from_value(&json!({ "title": "Why", "background": "dark" })).unwrap();
        assert_eq!(s.base.order, 0.0);
        assert!(s.base.visible);
        assert_eq!(s.base.background, Background::Dark);
        assert_eq!(s.pain_points, None);
    }

    #[test]
    fn unknown_background_names_the_field() {
        let err = HeroSection::from_value(&json!({ "title": "Hi", "background": "neon" }))
            .err()
            .unwrap();
        assert_eq!(err.path, "background");
        assert!(err.message.contains("neon"));
    }

    #[test]
    fn package_features_must_be_strings() {
        let v = json!({
            "title": "Pricing",
            "packages": [
                { "name": "A", "price": "1", "description": "d", "features": ["x"] },
                { "name": "B", "price": "2", "description": "d", "features": ["y", 3] }
            ]
        });
        let err = PricingSection::from_value(&v).err().unwrap();
        assert_eq!(err.path, "packages[1].features");
    }

    #[test]
    fn serializes_camel_case_and_skips_absent() {
        let hero = HeroSection::from_value(&json!({
            "title": "Grow with us",
            "ctaText": "Talk to us",
            "extra": 1
        }))
        .unwrap();
        let out = serde_json::to_value(&hero).unwrap();
        assert_eq!(out["ctaText"], "Talk to us");
        assert_eq!(out["background"], "light");
        assert!(out.get("ctaHref").is_none());
        assert!(out.get("extra").is_none());
    }
}
