//! Footer page content blocks and their renderer.
//!
//! A footer page is an ordered list of typed blocks. Rendering escapes the
//! text, then rewrites the only supported inline markup, `**bold**`, into a
//! `<strong>` span. Block types this version does not know deserialize to
//! [`Block::Unknown`] and render as nothing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Non-greedy `**...**` span; the content may not be empty.
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));

/// One typed content unit of a footer page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        text: String,
    },
    Subheading {
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        #[serde(default)]
        items: Vec<String>,
    },
    #[serde(other)]
    Unknown,
}

impl Block {
    pub fn is_known(&self) -> bool {
        !matches!(self, Block::Unknown)
    }
}

/// A block after inline markup has been applied. Text fields hold HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedBlock {
    Heading { html: String },
    Subheading { html: String },
    Paragraph { html: String },
    List { items: Vec<String> },
}

impl RenderedBlock {
    pub fn to_html(&self) -> String {
        match self {
            RenderedBlock::Heading { html } => format!("<h2>{html}</h2>"),
            RenderedBlock::Subheading { html } => format!("<h3>{html}</h3>"),
            RenderedBlock::Paragraph { html } => format!("<p>{html}</p>"),
            RenderedBlock::List { items } => {
                let mut out = String::from("<ul>");
                for item in items {
                    out.push_str("<li>");
                    out.push_str(item);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
                out
            }
        }
    }
}

/// Render a single block. Returns `None` for unknown block types.
pub fn render_block(block: &Block) -> Option<RenderedBlock> {
    let rendered = match block {
        Block::Heading { text } => RenderedBlock::Heading {
            html: escape_html(text),
        },
        Block::Subheading { text } => RenderedBlock::Subheading {
            html: escape_html(text),
        },
        Block::Paragraph { text } => RenderedBlock::Paragraph {
            html: render_inline(text),
        },
        Block::List { items } => RenderedBlock::List {
            items: items.iter().map(|item| render_inline(item)).collect(),
        },
        Block::Unknown => return None,
    };
    Some(rendered)
}

/// Render blocks in order, skipping unknown types.
pub fn render_blocks(blocks: &[Block]) -> Vec<RenderedBlock> {
    blocks.iter().filter_map(render_block).collect()
}

/// Render blocks straight to an HTML fragment, one block per line.
pub fn render_html(blocks: &[Block]) -> String {
    join_html(&render_blocks(blocks))
}

/// Join already rendered blocks into an HTML fragment, one block per line.
pub fn join_html(blocks: &[RenderedBlock]) -> String {
    blocks
        .iter()
        .map(RenderedBlock::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape `text` and turn `**bold**` spans into `<strong>` elements.
pub fn render_inline(text: &str) -> String {
    BOLD_RE
        .replace_all(&escape_html(text), "<strong>$1</strong>")
        .into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
