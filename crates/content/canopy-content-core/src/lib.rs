//! Canopy Content Core
//!
//! Typed records for the site's section collections (hero, rationale,
//! approach, process, pricing, FAQ, regulations). Raw JSON entries are
//! validated field by field; a malformed entry fails the load with the
//! collection, entry and field path that caused it.

pub mod collection;
pub mod error;
pub mod fields;
pub mod schema;

pub use collection::{
    load_collection, load_site, parse_entry, visible, Collection, Entry, SiteContent,
};
pub use error::{ContentError, FieldError};
pub use fields::{Fields, FromFields};
pub use schema::{
    Background, Card, Clause, FaqSection, HeroSection, HowSection, Image, Package, PricingSection,
    ProcessSection, Question, RegulationsSection, Section, SectionBase, Step, WhySection,
};
