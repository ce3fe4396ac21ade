//! Source positions for HCL and JSON configuration files.
//!
//! `hcl-rs` does not keep source locations, so block header lines and the
//! verbatim text of variable types are recovered from the span-preserving
//! `hcl-edit` parser. Spans may start on leading whitespace or comments; the
//! line reported is the one holding the block identifier.

use crate::error::Result;
use hcl_edit::structure::{Body, Structure};
use hcl_edit::Span;
use std::path::Path;

/// Source details of one top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPosition {
    /// 1-based line of the block header
    pub line: usize,
    /// The `type` attribute's expression exactly as written
    pub type_source: Option<String>,
}

/// Return the position of every top-level block, in file order.
///
/// # Errors
///
/// Returns `HclParse` if the content is not valid HCL.
pub fn block_positions(content: &str, file_path: &Path) -> Result<Vec<BlockPosition>> {
    let body = hcl_edit::parser::parse_body(content).map_err(|e| {
        let location = e.location();
        crate::err!(HclParse {
            file: file_path.to_path_buf(),
            message: e.message().to_string(),
            line: Some(location.line()),
            column: Some(location.column()),
        })
    })?;

    let index = LineIndex::new(content);
    Ok(body
        .iter()
        .filter_map(|structure| match structure {
            Structure::Block(block) => Some(BlockPosition {
                line: block
                    .span()
                    .map_or(1, |span| index.line_of(skip_decor(content, span.start))),
                type_source: attribute_source(content, &block.body, "type"),
            }),
            Structure::Attribute(_) => None,
        })
        .collect())
}

/// Slice the source text of attribute `key` out of `content`.
fn attribute_source(content: &str, body: &Body, key: &str) -> Option<String> {
    body.iter().find_map(|structure| match structure {
        Structure::Attribute(attr) if attr.key.as_str() == key => attr
            .value
            .span()
            .and_then(|span| content.get(span))
            .map(|text| text.trim().to_string()),
        _ => None,
    })
}

/// Line of the object key reached by following `keys` through a JSON
/// document, or of the deepest key found. Keys are matched textually, so
/// escaped names are not resolved.
#[must_use]
pub fn json_key_line(content: &str, keys: &[&str]) -> usize {
    let mut offset = 0;
    let mut found_at = None;

    for key in keys {
        let needle = format!("\"{key}\"");
        let hit = content[offset..].match_indices(&needle).find(|(i, _)| {
            content[offset + i + needle.len()..]
                .trim_start()
                .starts_with(':')
        });
        let Some((i, _)) = hit else {
            break;
        };
        found_at = Some(offset + i);
        offset += i + needle.len();
    }

    found_at.map_or(1, |at| LineIndex::new(content).line_of(at))
}

/// Advance `offset` past whitespace and comments.
fn skip_decor(content: &str, mut offset: usize) -> usize {
    loop {
        let rest = &content[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();

        let comment_len = if trimmed.starts_with('#') || trimmed.starts_with("//") {
            trimmed.find('\n').map_or(trimmed.len(), |i| i + 1)
        } else if trimmed.starts_with("/*") {
            trimmed.find("*/").map_or(trimmed.len(), |i| i + 2)
        } else {
            return offset;
        };
        offset += comment_len;
    }
}

/// Byte offsets at which each line starts.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}
