use crate::model::Building;
use crate::parser::departments::DepartmentMap;

/// Attach department lists to the canonical buildings.
///
/// Maps are applied in page order and a later page replaces an earlier
/// page's list for the same code wholesale; entries are never combined.
/// Codes that are not in the canonical list are dropped.
pub fn merge_departments(mut buildings: Vec<Building>, page_maps: &[DepartmentMap]) -> Vec<Building> {
    for building in &mut buildings {
        for map in page_maps {
            if let Some(departments) = map.get(&building.code) {
                building.departments = Some(departments.clone());
            }
        }
    }
    buildings
}
