use std::collections::{HashMap, HashSet};

use scraper::Html;
use tracing::debug;

use super::blocks::{paragraph_parts, Block, Part};
use super::sections::{toggle_sections, ToggleSection};
use crate::model::{Building, Department};

/// Status marker appended when a section mentions an ongoing renovation.
pub const RENOVATION_MARKER: &str = "in Sanierung";

/// Departments of one area page, keyed by building code.
pub type DepartmentMap = HashMap<String, Vec<Department>>;

/// Insertion-ordered list of departments with unique names.
#[derive(Debug, Default)]
pub struct DepartmentList {
    entries: Vec<Department>,
    seen: HashSet<String>,
}

impl DepartmentList {
    /// Add an entry unless its name is empty or already present.
    /// Returns whether it was added.
    pub fn push(&mut self, name: String, link: Option<String>) -> bool {
        self.push_entry(Department::new(name, link))
    }

    pub fn push_entry(&mut self, department: Department) -> bool {
        if department.name.is_empty() || self.seen.contains(&department.name) {
            return false;
        }
        self.seen.insert(department.name.clone());
        self.entries.push(department);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Department> {
        self.entries
    }
}

/// Extract every building's department list from one area page.
///
/// `buildings` supplies each code's street address so address lines inside
/// a section are not mistaken for departments.
pub fn extract_departments(html: &str, buildings: &[Building]) -> DepartmentMap {
    let document = Html::parse_document(html);
    let mut map = DepartmentMap::new();

    for section in toggle_sections(&document) {
        let address = buildings
            .iter()
            .find(|b| b.code == section.code)
            .map(|b| b.address.as_str());

        let list = section_departments(&section, address);
        if list.is_empty() {
            debug!("Section {} has no departments", section.code);
            continue;
        }
        map.insert(section.code, list.into_vec());
    }

    map
}

fn section_departments(section: &ToggleSection, address: Option<&str>) -> DepartmentList {
    let mut list = DepartmentList::default();

    for paragraph in section.paragraphs() {
        for part in paragraph_parts(paragraph) {
            match part {
                // One entry per linked line, whatever else shares the line
                Part::Linked { text, href } => {
                    list.push(text, href);
                }
                Part::Nodes(blocks) => {
                    for block in blocks {
                        match block {
                            Block::Link { text, href } => {
                                list.push(text, href);
                            }
                            Block::Strong(text) => {
                                list.push(text, None);
                            }
                            Block::Text(text) => {
                                if is_address_noise(&text, address) {
                                    continue;
                                }
                                list.push(text, None);
                            }
                        }
                    }
                }
            }
        }
    }

    if section.text().contains(RENOVATION_MARKER) && !list.contains(RENOVATION_MARKER) {
        list.push_entry(Department::plain(RENOVATION_MARKER));
    }

    list
}

/// Single characters (separators, stray punctuation) and the building's own
/// street address are not departments. Length is counted in UTF-16 units,
/// so a lone emoji or other astral character is kept.
fn is_address_noise(text: &str, address: Option<&str>) -> bool {
    text.encode_utf16().count() <= 1 || address == Some(text)
}

// ── Tests ──
