//! Parsed HTML document and the text helpers the extractors share.

use std::cell::OnceCell;

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::ScraperError;

/// Elements whose text never renders.
const INVISIBLE: [&str; 4] = ["script", "style", "noscript", "template"];

/// A parsed page. Not `Send`: parse, query and drop it between awaits.
pub struct Document {
    html: Html,
    text: OnceCell<String>,
}

impl Document {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
            text: OnceCell::new(),
        }
    }

    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> scraper::html::Select<'a, 'b> {
        self.html.select(selector)
    }

    #[must_use]
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// All visible text of the page, fragments concatenated in document
    /// order. Computed once.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            let mut out = String::new();
            for node in self.html.root_element().descendants() {
                let Node::Text(text) = node.value() else {
                    continue;
                };
                let hidden = node.ancestors().any(|a| {
                    a.value()
                        .as_element()
                        .is_some_and(|e| INVISIBLE.contains(&e.name()))
                });
                if !hidden {
                    out.push_str(text);
                }
            }
            out
        })
    }
}

/// Full text of `el`, trimmed at both ends.
#[must_use]
pub fn node_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of `el` with every fragment trimmed before concatenation, so icon
/// padding and indentation between child nodes disappear.
#[must_use]
pub fn compact_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] if `selector` is not valid CSS.
pub fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
