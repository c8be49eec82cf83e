//! # Card Extractor Module
//!
//! Turns a rendered listing page into raw event fragments, one per event card,
//! in document order. Cards missing a title, date or location are dropped here
//! and never reach the pipeline's quota counter.

mod error;

pub use error::ExtractError;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::fetcher::HtmlDocument;

/// One raw, unvalidated event card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventFragment {
    /// Heading text
    pub title: String,

    /// Date label text, as shown on the card
    pub date_text: String,

    /// Subtitle text, usually the venue
    pub location_text: String,

    /// Image `src`, empty when the card has no image
    #[serde(default)]
    pub image_url: String,

    /// Card body text, empty when absent
    #[serde(default)]
    pub description_text: String,
}

impl RawEventFragment {
    /// Flatten the fragment into the single line of text handed to the oracle
    pub fn flatten(&self) -> String {
        format!(
            "Title: {}, Date: {}, Location: {}, ImageURL: {}, Description: {}",
            self.title, self.date_text, self.location_text, self.image_url, self.description_text
        )
    }
}

/// CSS selectors locating a card and its fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSelectors {
    pub card: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub image: String,
    pub description: String,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            card: "li.event-card".to_string(),
            title: "h3".to_string(),
            date: "div.date".to_string(),
            location: "div.subtitle".to_string(),
            image: "img.event-img".to_string(),
            description: "p.card-text".to_string(),
        }
    }
}

/// Parsed form of `CardSelectors`
struct CompiledSelectors {
    card: Selector,
    title: Selector,
    date: Selector,
    location: Selector,
    image: Selector,
    description: Selector,
}

impl CompiledSelectors {
    fn compile(selectors: &CardSelectors) -> Result<Self, ExtractError> {
        Ok(Self {
            card: parse_selector(&selectors.card)?,
            title: parse_selector(&selectors.title)?,
            date: parse_selector(&selectors.date)?,
            location: parse_selector(&selectors.location)?,
            image: parse_selector(&selectors.image)?,
            description: parse_selector(&selectors.description)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Trimmed text of the first element under `card` matching `selector`
fn first_text(card: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Extract every complete event card from a rendered document
///
/// # Arguments
///
/// * `document` - The rendered listing page
/// * `selectors` - Where to find cards and their fields
///
/// # Returns
///
/// The fragments in document order
#[instrument(skip_all, fields(url = %document.url))]
pub fn extract_fragments(
    document: &HtmlDocument,
    selectors: &CardSelectors,
) -> Result<Vec<RawEventFragment>, ExtractError> {
    let compiled = CompiledSelectors::compile(selectors)?;
    let html = Html::parse_document(&document.html);

    let mut fragments = Vec::new();
    for (index, card) in html.select(&compiled.card).enumerate() {
        let title = first_text(&card, &compiled.title);
        let date_text = first_text(&card, &compiled.date);
        let location_text = first_text(&card, &compiled.location);

        let (Some(title), Some(date_text), Some(location_text)) = (title, date_text, location_text)
        else {
            debug!("Skipping card {}: missing title, date or location", index);
            continue;
        };

        let image_url = card
            .select(&compiled.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string)
            .unwrap_or_default();
        let description_text = first_text(&card, &compiled.description).unwrap_or_default();

        fragments.push(RawEventFragment {
            title,
            date_text,
            location_text,
            image_url,
            description_text,
        });
    }

    debug!("Extracted {} fragments", fragments.len());
    Ok(fragments)
}
