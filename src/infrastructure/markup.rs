//! Regex-based markup scanner.
//!
//! Flattens raw HTML into the `PageContent` view the extractor consumes:
//! whitespace-stripped text nodes plus elements carrying a class attribute.
//! Best-effort by design - an element's text scopes to the nearest close tag
//! of the same name, which is good enough for the flat result tables this
//! monitor reads.

use std::collections::HashMap;

use regex::Regex;

use crate::domain::extraction::{PageContent, TaggedElement};

pub struct MarkupScanner {
    script_re: Regex,
    style_re: Regex,
    open_tag_re: Regex,
    tag_re: Regex,
}

impl MarkupScanner {
    pub fn new() -> Self {
        Self {
            script_re: Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")
                .expect("static script pattern"),
            style_re: Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>")
                .expect("static style pattern"),
            open_tag_re: Regex::new(
                r#"(?is)<([a-z][a-z0-9]*)\b[^>]*?class\s*=\s*["']([^"']*)["'][^>]*>"#,
            )
            .expect("static open tag pattern"),
            tag_re: Regex::new(r"(?s)<[^>]*>").expect("static tag pattern"),
        }
    }

    /// Flatten one HTML document into text nodes and tagged elements
    pub fn scan(&self, html: &str) -> PageContent {
        let stripped = self.script_re.replace_all(html, " ");
        let stripped = self.style_re.replace_all(&stripped, " ");

        let mut elements = Vec::new();
        let mut close_cache: HashMap<String, Regex> = HashMap::new();

        for captures in self.open_tag_re.captures_iter(&stripped) {
            let name = captures[1].to_lowercase();
            let class_attr = captures[2].to_string();
            let rest = &stripped[captures.get(0).expect("whole match").end()..];

            let close_re = close_cache.entry(name.clone()).or_insert_with(|| {
                Regex::new(&format!(r"(?i)</{}\s*>", regex::escape(&name)))
                    .expect("close tag pattern")
            });

            // Elements left unclosed are dropped; their text still reaches
            // the text-node scan below
            if let Some(close) = close_re.find(rest) {
                let text = self.strip_tags(&rest[..close.start()]);
                elements.push(TaggedElement::new(name, class_attr, text));
            }
        }

        let text_nodes = self
            .tag_re
            .replace_all(&stripped, "\n")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        PageContent::new(text_nodes, elements)
    }

    fn strip_tags(&self, fragment: &str) -> String {
        self.tag_re
            .replace_all(fragment, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for MarkupScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_nodes_are_stripped_and_ordered() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan(
            "<html><body><h1> 東京 → 秋田 </h1><p>最安値 6,300円 から</p></body></html>",
        );
        assert_eq!(page.text_nodes, vec!["東京 → 秋田", "最安値 6,300円 から"]);
    }

    #[test]
    fn test_class_elements_are_collected_with_inner_text() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan(
            r#"<table><td class="fare-amount"><b>7,000</b>円</td><td>unclassed</td></table>"#,
        );
        assert_eq!(page.elements.len(), 1);
        assert_eq!(page.elements[0].name, "td");
        assert_eq!(page.elements[0].class_attr, "fare-amount");
        assert_eq!(page.elements[0].text, "7,000 円");
    }

    #[test]
    fn test_script_and_style_content_is_dropped() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan(
            "<script>var price = 9999;</script><style>.fare { color: red }</style><p>7000円</p>",
        );
        assert_eq!(page.text_nodes, vec!["7000円"]);
        assert!(page.elements.is_empty());
    }

    #[test]
    fn test_single_quoted_and_uppercase_markup() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan("<DIV CLASS='ticketPrice'>6300</DIV>");
        assert_eq!(page.elements.len(), 1);
        assert_eq!(page.elements[0].name, "div");
        assert_eq!(page.elements[0].class_attr, "ticketPrice");
        assert_eq!(page.elements[0].text, "6300");
    }

    #[test]
    fn test_multiple_fare_cells_in_one_table() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan(
            r#"<tr><td class="fare">6,300円</td><td class="fare">7,300円</td></tr>"#,
        );
        assert_eq!(page.elements.len(), 2);
        assert_eq!(page.elements[0].text, "6,300円");
        assert_eq!(page.elements[1].text, "7,300円");
    }

    #[test]
    fn test_malformed_markup_never_panics() {
        let scanner = MarkupScanner::new();
        let page = scanner.scan("<div class=\"fare\">6300<p>broken");
        // Unclosed elements fall through to the text-node scan
        assert!(page.elements.is_empty());
        assert!(page.full_text().contains("6300"));
    }
}
