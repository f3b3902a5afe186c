use anyhow::{bail, Result};
use rayon::prelude::*;
use tracing::info;

use crate::merge::merge_departments;
use crate::model::{Building, Page};
use crate::parser::departments::{extract_departments, DepartmentMap};
use crate::parser::table::parse_buildings;

/// Turn fetched pages into the final directory.
///
/// The first page is the address table, every following page an area page.
/// Area pages are parsed independently; their maps keep page order so the
/// merge result does not depend on scheduling.
pub fn build_directory(pages: &[Page]) -> Result<Vec<Building>> {
    let Some((table_page, area_pages)) = pages.split_first() else {
        bail!("No pages to build from; the address table page is required");
    };

    let buildings = parse_buildings(&table_page.html);
    info!("Parsed {} buildings from {}", buildings.len(), table_page.url);

    let page_maps: Vec<DepartmentMap> = area_pages
        .par_iter()
        .map(|page| extract_departments(&page.html, &buildings))
        .collect();

    for (page, map) in area_pages.iter().zip(&page_maps) {
        info!("{}: departments for {} buildings", page.url, map.len());
    }

    let merged = merge_departments(buildings, &page_maps);
    let with_departments = merged.iter().filter(|b| b.departments.is_some()).count();
    info!(
        "Merged: {} buildings, {} with departments",
        merged.len(),
        with_departments
    );
    Ok(merged)
}
