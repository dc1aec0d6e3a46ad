// src/extract/locate.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::error::{EtlError, Result};

/// Wikipedia's heading id for the section holding the table.
pub const SECTION_ANCHOR_ID: &str = "By_market_capitalization";
/// Normalized heading text used when the id is missing.
pub const SECTION_HEADING_TEXT: &str = "by market capitalization";
/// Class token marking a data table.
pub const TABLE_CLASS_MARKER: &str = "wikitable";

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6, span").expect("heading selector"));

/// Locate the market-cap table and return its markup only.
///
/// The section anchor is the element with id [`SECTION_ANCHOR_ID`], or else the
/// first heading whose trimmed, lower-cased text is [`SECTION_HEADING_TEXT`].
/// From there the nearest following `<table>` carrying a class containing
/// [`TABLE_CLASS_MARKER`] is returned.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn find_market_cap_table(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);

    let anchor = find_anchor(&doc).ok_or(EtlError::SectionNotFound)?;
    debug!(tag = anchor.value().name(), "found section anchor");

    let table = next_data_table(&doc, anchor).ok_or(EtlError::TableNotFound)?;
    Ok(table.html())
}

fn find_anchor(doc: &Html) -> Option<ElementRef<'_>> {
    let by_id = doc
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(SECTION_ANCHOR_ID));
    if by_id.is_some() {
        return by_id;
    }

    doc.select(&HEADING_SELECTOR)
        .find(|el| heading_text(el) == SECTION_HEADING_TEXT)
}

/// Text with each fragment trimmed and joined, then case-folded.
fn heading_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .collect::<String>()
        .to_lowercase()
}

/// First data table after `anchor` in document order.
fn next_data_table<'a>(doc: &'a Html, anchor: ElementRef<'a>) -> Option<ElementRef<'a>> {
    doc.tree
        .root()
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value().name() == "table"
                && el.value().classes().any(|c| c.contains(TABLE_CLASS_MARKER))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"<table class="wikitable sortable"><tr><th>Rank</th></tr></table>"#;

    #[test]
    fn finds_table_after_anchor_id() {
        let html = format!(
            r#"<html><body>
            <table class="wikitable"><tr><th>Other</th></tr></table>
            <div class="mw-heading"><h2 id="By_market_capitalization">By market capitalization</h2></div>
            <p>intro</p>
            {TABLE}
            </body></html>"#
        );
        let table = find_market_cap_table(&html).unwrap();
        assert!(table.starts_with("<table"));
        assert!(table.contains("Rank"));
        assert!(!table.contains("Other"));
    }

    #[test]
    fn falls_back_to_heading_text() {
        let html = format!(
            r#"<html><body>
            <h3>  By Market Capitalization </h3>
            {TABLE}
            </body></html>"#
        );
        let table = find_market_cap_table(&html).unwrap();
        assert!(table.contains("Rank"));
    }

    #[test]
    fn heading_text_is_trimmed_per_fragment() {
        let html = format!(
            r#"<html><body>
            <h2><span>By market</span> <span>capitalization</span></h2>
            {TABLE}
            </body></html>"#
        );
        // nested span text fragments are trimmed before joining
        assert!(find_market_cap_table(&html).is_err());

        let html = format!(
            r#"<html><body><h2><span> By market capitalization</span></h2>{TABLE}</body></html>"#
        );
        assert!(find_market_cap_table(&html).unwrap().contains("Rank"));
    }

    #[test]
    fn skips_tables_without_marker_class() {
        let html = r#"<html><body>
            <h2 id="By_market_capitalization">x</h2>
            <table class="infobox"><tr><td>nope</td></tr></table>
            <table class="big-wikitable-x"><tr><th>Bank name</th></tr></table>
            </body></html>"#;
        let table = find_market_cap_table(html).unwrap();
        assert!(table.contains("Bank name"));
        assert!(!table.contains("nope"));
    }

    #[test]
    fn missing_section_is_reported() {
        let html = format!("<html><body><h2>By total assets</h2>{TABLE}</body></html>");
        assert!(matches!(
            find_market_cap_table(&html),
            Err(EtlError::SectionNotFound)
        ));
    }

    #[test]
    fn missing_table_is_reported() {
        let html = r#"<html><body>
            <table class="wikitable"><tr><th>Before</th></tr></table>
            <h2 id="By_market_capitalization">By market capitalization</h2>
            <p>no table here</p>
            </body></html>"#;
        assert!(matches!(
            find_market_cap_table(html),
            Err(EtlError::TableNotFound)
        ));
    }
}
