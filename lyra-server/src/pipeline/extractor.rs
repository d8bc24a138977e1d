//! Lyric text extraction from a lyrics page
//!
//! The lyrics site marks each rendered lyric block with a
//! `data-lyrics-container` attribute. Only those elements are read; line
//! breaks inside them become `\n` so verse structure survives flattening.

use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};

/// Attribute marking a lyric block
pub const CONTAINER_ATTRIBUTE: &str = "data-lyrics-container";

static CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!("[{}]", CONTAINER_ATTRIBUTE))
        .expect("container selector is valid")
});

/// Extract the lyric text of an HTML page
///
/// Containers are visited once each in document order, each followed by one
/// `\n`. A marker with an empty value does not qualify. Returns an empty
/// string when no container qualifies.
pub fn extract(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut lyrics = String::new();

    for container in document.select(&CONTAINER_SELECTOR) {
        let marked = container
            .value()
            .attr(CONTAINER_ATTRIBUTE)
            .is_some_and(|v| !v.is_empty());
        if !marked {
            continue;
        }

        for node in container.descendants() {
            match node.value() {
                Node::Text(text) => lyrics.push_str(text),
                Node::Element(element) if element.name() == "br" => lyrics.push('\n'),
                _ => {}
            }
        }
        lyrics.push('\n');
    }

    lyrics
}
