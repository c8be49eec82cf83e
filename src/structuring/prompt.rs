//! Extraction prompt for the structuring oracle

use super::event::EventCategory;

/// Build the extraction prompt for one flattened fragment.
///
/// `year` is assumed for dates that do not carry one.
pub fn build_prompt(raw_text: &str, year: i32) -> String {
    let categories = EventCategory::LISTED
        .iter()
        .map(EventCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an expert data extraction assistant. Based on the following raw text scraped from an event website, extract the event information and return it as a clean JSON object.
The JSON object must have these exact keys: "title", "category", "date", "location", "description", "imageUrl".

Instructions:
1. "title": The official name of the event.
2. "category": Infer a single category from the title. The value MUST be one of these exact uppercase options: {categories}.
3. "date": Convert the date provided into a standard YYYY-MM-DD format. If the date has no year, use the current year, {year}.
4. "location": The name of the venue or place.
5. "description": A short, one-sentence description of the event based on the description text provided. If no description is available, use an empty string.
6. "imageUrl": The full URL of the event image. If no URL is provided, use an empty string.

Here is the raw text:
---
{raw_text}
---
Return only the JSON object, with no other text before or after it."#
    )
}
