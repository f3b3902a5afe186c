use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::model::{collapse_whitespace, Building};

/// Canonical building list from the address-table page.
///
/// Every `<tr>` with exactly four `<td>` cells becomes
/// `[code, name, address, city line]`. Rows with another cell count, or an
/// empty code cell (headers, separators), are skipped.
pub fn parse_buildings(html: &str) -> Vec<Building> {
    let document = Html::parse_document(html);

    let table_selector = Selector::parse("table").unwrap();
    let tr_selector = Selector::parse("tr").unwrap();
    let td_selector = Selector::parse("td").unwrap();

    let mut buildings = Vec::new();
    let mut skipped = 0usize;
    for table in document.select(&table_selector) {
        for row in table.select(&tr_selector) {
            let cells: Vec<String> = row.select(&td_selector).map(cell_text).collect();
            let [code, name, address, city_line] = match <[String; 4]>::try_from(cells) {
                Ok(cells) => cells,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            if code.is_empty() {
                skipped += 1;
                continue;
            }
            buildings.push(Building {
                code,
                name,
                address,
                city_line,
                departments: None,
            });
        }
    }

    debug!("Address table: {} buildings, {} rows skipped", buildings.len(), skipped);
    buildings
}

fn cell_text(cell: ElementRef) -> String {
    collapse_whitespace(&cell.text().collect::<String>())
}
