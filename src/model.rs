use serde::{Deserialize, Serialize};

/// One row of the campus address table, optionally enriched with the
/// departments found on the area pages.
///
/// Field names on the wire are the German labels the app reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    #[serde(rename = "Gebäude")]
    pub code: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Adresse")]
    pub address: String,
    #[serde(rename = "PLZ_Ort")]
    pub city_line: String,
    #[serde(rename = "Departments", skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<Department>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub link: Option<String>,
}

impl Department {
    pub fn new(name: impl Into<String>, link: Option<String>) -> Self {
        Self {
            name: name.into(),
            link,
        }
    }

    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

/// Raw HTML of one source page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<&str>>().join(" ")
}
