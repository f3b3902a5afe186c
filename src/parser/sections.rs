use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]\d+\|\d+").unwrap());

/// A collapsible per-building block of an area page.
#[derive(Debug, Clone)]
pub struct ToggleSection<'a> {
    pub code: String,
    pub element: ElementRef<'a>,
}

impl<'a> ToggleSection<'a> {
    pub fn paragraphs(&self) -> Vec<ElementRef<'a>> {
        let p_selector = Selector::parse("p").unwrap();
        self.element.select(&p_selector).collect()
    }

    /// Raw text of the whole section, whitespace untouched.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

/// All toggle sections whose headings name a building code, in document order.
/// Sections without a code are not returned.
pub fn toggle_sections(document: &Html) -> Vec<ToggleSection<'_>> {
    let section_selector = Selector::parse("section.toggle-section").unwrap();
    document
        .select(&section_selector)
        .filter_map(|element| {
            let code = building_code(element)?;
            Some(ToggleSection { code, element })
        })
        .collect()
}

/// Scan `h3`/`h2` headings in document order; the last heading that carries
/// a code decides.
pub fn building_code(section: ElementRef) -> Option<String> {
    let heading_selector = Selector::parse("h3, h2").unwrap();
    section
        .select(&heading_selector)
        .filter_map(|h| {
            let text: String = h.text().collect();
            CODE_RE.find(&text).map(|m| m.as_str().to_string())
        })
        .last()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        toggle_sections(&document).into_iter().map(|s| s.code).collect()
    }

    #[test]
    fn code_from_heading() {
        let html = r#"<section class="toggle-section"><h3>Karo 5 (S1|03)</h3><p>x</p></section>"#;
        assert_eq!(codes(html), vec!["S1|03"]);
    }

    #[test]
    fn section_without_code_skipped() {
        let html = concat!(
            r#"<section class="toggle-section"><h3>Allgemeines</h3><p>x</p></section>"#,
            r#"<section class="toggle-section"><h2>L2|06</h2></section>"#,
        );
        assert_eq!(codes(html), vec!["L2|06"]);
    }

    #[test]
    fn last_matching_heading_wins() {
        let html = concat!(
            r#"<section class="toggle-section">"#,
            r#"<h2>S1|01 und S1|02</h2><h3>S1|05</h3><h3>ohne Code</h3>"#,
            r#"</section>"#,
        );
        assert_eq!(codes(html), vec!["S1|05"]);
    }

    #[test]
    fn first_match_within_heading() {
        let html = r#"<section class="toggle-section"><h3>S1|01 und S1|02</h3></section>"#;
        assert_eq!(codes(html), vec!["S1|01"]);
    }

    #[test]
    fn other_sections_and_headings_ignored() {
        let html = concat!(
            r#"<section class="teaser"><h3>S1|01</h3></section>"#,
            r#"<section class="toggle-section"><h4>S1|02</h4></section>"#,
        );
        assert!(codes(html).is_empty());
    }

    #[test]
    fn lowercase_prefix_does_not_match() {
        let html = r#"<section class="toggle-section"><h3>s1|01</h3></section>"#;
        assert!(codes(html).is_empty());
    }

    #[test]
    fn stadtmitte_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/stadtmitte.html").unwrap();
        assert_eq!(codes(&html), vec!["S1|01", "S1|03", "S2|02", "S1|03"]);
    }
}
