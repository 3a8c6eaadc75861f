use crate::config::SelectorSet;
use crate::error::ParseError;
use crate::parsers::text;
use crate::results::VehicleRecord;
use scraper::{ElementRef, Html, Selector};

/// Selectors of a site profile, compiled once per page
pub struct CompiledSelectors {
    card: Selector,
    name: Selector,
    color: Option<Selector>,
    sku: Selector,
}

impl CompiledSelectors {
    /// Compile every selector in the set, failing on the first invalid one
    pub fn compile(set: &SelectorSet) -> Result<Self, ParseError> {
        Ok(Self {
            card: compile_one("card", &set.card)?,
            name: compile_one("name", &set.name)?,
            color: set
                .color
                .as_deref()
                .map(|sel| compile_one("color", sel))
                .transpose()?,
            sku: compile_one("sku", &set.sku)?,
        })
    }
}

fn compile_one(field: &'static str, selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracts one vehicle record per card element, in document order
///
/// Sub-elements that are missing from a card produce an empty field rather
/// than an error. The only failure is a selector that does not compile.
pub fn extract(
    html: &str,
    selectors: &SelectorSet,
    location: &str,
) -> Result<Vec<VehicleRecord>, ParseError> {
    let compiled = CompiledSelectors::compile(selectors)?;
    Ok(extract_compiled(html, &compiled, location))
}

/// Same as [`extract`] with already compiled selectors
pub fn extract_compiled(
    html: &str,
    selectors: &CompiledSelectors,
    location: &str,
) -> Vec<VehicleRecord> {
    let doc = Html::parse_document(html);

    let records = doc
        .select(&selectors.card)
        .map(|card| {
            let name = field_text(card, &selectors.name);
            let color = selectors
                .color
                .as_ref()
                .map(|sel| field_text(card, sel))
                .unwrap_or_default();
            let sku = field_text(card, &selectors.sku);

            VehicleRecord::new(name, color, sku, location.to_string())
        })
        .collect::<Vec<_>>();

    ::log::debug!("Extracted {} vehicles for {}", records.len(), location);

    records
}

/// Text of every element under `card` matching `selector`, whitespace collapsed
fn field_text(card: ElementRef<'_>, selector: &Selector) -> String {
    let raw = card
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<Vec<_>>()
        .join(" ");

    text::clean_field(&raw)
}
