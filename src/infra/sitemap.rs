use crate::error::{AuditError, Result};
use roxmltree::{Document, Node, ParsingOptions};

/// `loc` values of every `urlset/url` entry, in document order.
///
/// Elements are matched on their local name, so prefixed and default-namespace
/// sitemaps read the same. A document without a `urlset` root (a sitemap index,
/// an HTML error page) or one that is not well-formed XML is an error; a
/// `urlset` with no entries is an empty list.
pub fn parse_locations(xml: &str) -> Result<Vec<String>> {
    let xml = xml.trim_start_matches('\u{feff}').trim_start();
    let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    let document = Document::parse_with_options(xml, options)
        .map_err(|e| AuditError::Sitemap(format!("malformed sitemap XML: {}", e)))?;

    let root = document.root_element();
    if root.tag_name().name() != "urlset" {
        return Err(AuditError::Sitemap(format!(
            "document root is <{}>, not <urlset>",
            root.tag_name().name()
        )));
    }

    let locations = root
        .children()
        .filter(|node| is_named(node, "url"))
        .filter_map(|url| url.children().find(|node| is_named(node, "loc")))
        .map(text_content)
        .filter(|loc| !loc.is_empty())
        .collect();
    Ok(locations)
}

fn is_named(node: &Node<'_, '_>, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

// CDATA sections surface as text nodes
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}
