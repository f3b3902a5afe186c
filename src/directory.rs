//! Lookup helpers over a written building directory, ordered and filtered
//! the same way the app's building list presents it.

use crate::model::Building;

/// Campus areas in display order: Stadtmitte, Lichtwiese, Botanischer
/// Garten, Hochschulstadion, Windkanal.
const PREFIX_ORDER: &[char] = &['S', 'L', 'B', 'H', 'W'];

/// Buildings whose name, address or code contains `query`.
///
/// Codes also match with spaces and `|` removed on both sides, so `s103`
/// finds `S1|03`.
pub fn search<'a>(buildings: &'a [Building], query: &str) -> Vec<&'a Building> {
    let needle = query.to_lowercase();
    let compact_needle = normalize_code(query);
    buildings
        .iter()
        .filter(|b| {
            b.name.to_lowercase().contains(&needle)
                || b.address.to_lowercase().contains(&needle)
                || b.code.to_lowercase().contains(&needle)
                || normalize_code(&b.code).contains(&compact_needle)
        })
        .collect()
}

/// Stable sort by campus prefix, then by the building number after it.
pub fn sort_for_display(buildings: &mut [&Building]) {
    buildings.sort_by_key(|b| (prefix_rank(&b.code), leading_number(&b.code)));
}

pub fn find<'a>(buildings: &'a [Building], code: &str) -> Option<&'a Building> {
    buildings.iter().find(|b| b.code == code)
}

fn normalize_code(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '|')
        .collect::<String>()
        .to_lowercase()
}

/// Unknown capital prefixes rank before the known areas; codes that do not
/// start with a capital letter rank after them.
fn prefix_rank(code: &str) -> i64 {
    match code.chars().next() {
        Some(c) if c.is_ascii_uppercase() => PREFIX_ORDER
            .iter()
            .position(|p| *p == c)
            .map_or(-1, |i| i as i64),
        _ => PREFIX_ORDER.len() as i64,
    }
}

/// Integer directly after the letter prefix (`S1|03` → 1), 0 when absent.
fn leading_number(code: &str) -> u64 {
    let rest = code.trim_start_matches(|c: char| c.is_ascii_uppercase());
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
