use std::sync::LazyLock;

use regex::Regex;

/// Campus-wide address table. Always the first page of a run.
pub const ADDRESS_TABLE_URL: &str =
    "https://www.tu-darmstadt.de/universitaet/campus/gebaeudeadressen_2/index.de.jsp";

/// Per-area department pages, in merge order. A later page wins when two
/// pages list the same building.
pub const DEPARTMENT_URLS: &[&str] = &[
    "https://www.tu-darmstadt.de/universitaet/campus/stadtmitte_3/index.de.jsp",
    "https://www.tu-darmstadt.de/universitaet/campus/botanischer_garten_1/index.de.jsp",
    "https://www.tu-darmstadt.de/universitaet/campus/lichtwiese_2/index.de.jsp",
    "https://www.tu-darmstadt.de/universitaet/campus/hochschulstadion/index.de.jsp",
    "https://www.tu-darmstadt.de/universitaet/campus/windkanal_flugplatz/index.de.jsp",
];

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/campus/([A-Za-z0-9_-]+)/").unwrap());

/// Address table first, then the department pages.
pub fn all_urls() -> Vec<String> {
    std::iter::once(ADDRESS_TABLE_URL)
        .chain(DEPARTMENT_URLS.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Short name for a source page, used as its snapshot file stem.
pub fn page_slug(url: &str) -> String {
    if let Some(caps) = SLUG_RE.captures(url) {
        return caps[1].to_string();
    }
    // Fall back to something filesystem-safe
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}
