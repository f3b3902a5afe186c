use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::model::collapse_whitespace;

static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// What one line of a paragraph (the markup between two `<br>`s) contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// The line holds an anchor: the whole line's text is one label.
    Linked { text: String, href: Option<String> },
    /// No anchor on the line: its top-level nodes, in order.
    Nodes(Vec<Block>),
}

/// A top-level node of a link-free line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Link { text: String, href: Option<String> },
    Strong(String),
    Text(String),
}

/// Split a paragraph's inner markup on `<br>` variants.
pub fn split_lines(inner_html: &str) -> Vec<&str> {
    BR_RE.split(inner_html).collect()
}

/// Classify every line of a paragraph.
pub fn paragraph_parts(paragraph: ElementRef) -> Vec<Part> {
    let inner = paragraph.inner_html();
    split_lines(&inner).into_iter().map(classify_part).collect()
}

pub fn classify_part(markup: &str) -> Part {
    let fragment = Html::parse_fragment(markup);
    let root = fragment.root_element();

    if markup.contains("<a ") {
        let a_selector = Selector::parse("a").unwrap();
        if let Some(anchor) = root.select(&a_selector).next() {
            return Part::Linked {
                text: element_text(root),
                href: href_of(anchor.value().attr("href")),
            };
        }
    }

    let blocks = root
        .children()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(Block::Text(collapse_whitespace(text))),
            Node::Element(el) => {
                let element = ElementRef::wrap(node)?;
                match el.name() {
                    "a" => Some(Block::Link {
                        text: element_text(element),
                        href: href_of(el.attr("href")),
                    }),
                    "strong" => Some(Block::Strong(element_text(element))),
                    _ => None,
                }
            }
            _ => None,
        })
        .collect();
    Part::Nodes(blocks)
}

/// A missing or empty `href` both mean "no link".
fn href_of(attr: Option<&str>) -> Option<String> {
    attr.filter(|h| !h.is_empty()).map(str::to_string)
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}
