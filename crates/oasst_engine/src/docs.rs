use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use oasst_core::DocsIndex;
use oasst_logging::oasst_debug;

const BUNDLE_MARKER: &str = "JSON.parse('";

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("failed to read docs index {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no JSON.parse literal found in bundle")]
    MissingLiteral,
    #[error("unterminated string literal at byte {0}")]
    Unterminated(usize),
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("invalid docs index: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a docs index from plain JSON or from a built bundle embedding it.
pub fn load_docs_index(path: &Path) -> Result<DocsIndex, DocsError> {
    let content = fs::read_to_string(path).map_err(|source| DocsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let index = if content.trim_start().starts_with('{') {
        serde_json::from_str(&content)?
    } else {
        parse_docs_bundle(&content)?
    };
    oasst_debug!(
        "Loaded docs index {:?}: {} sidebars, {} docs",
        path,
        index.docs_sidebars.len(),
        index.docs.len()
    );
    Ok(index)
}

/// Extracts the index from the first `JSON.parse('…')` call of a script bundle.
pub fn parse_docs_bundle(script: &str) -> Result<DocsIndex, DocsError> {
    let start = script.find(BUNDLE_MARKER).ok_or(DocsError::MissingLiteral)? + BUNDLE_MARKER.len();
    let json = unescape_single_quoted(script, start)?;
    Ok(serde_json::from_str(&json)?)
}

/// Reads a JavaScript single-quoted string body starting at `start`.
fn unescape_single_quoted(source: &str, start: usize) -> Result<String, DocsError> {
    let mut out = String::new();
    let mut chars = source[start..].char_indices();
    while let Some((offset, ch)) = chars.next() {
        let at = start + offset;
        match ch {
            '\'' => return Ok(out),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(DocsError::Unterminated(at))?;
                match escaped {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    '\n' => {}
                    'x' => out.push(hex_char(&mut chars, 2, at)?),
                    'u' => out.push(hex_char(&mut chars, 4, at)?),
                    other => out.push(other),
                }
            }
            '\n' => return Err(DocsError::Unterminated(at)),
            other => out.push(other),
        }
    }
    Err(DocsError::Unterminated(source.len()))
}

fn hex_char(
    chars: &mut std::str::CharIndices<'_>,
    digits: usize,
    at: usize,
) -> Result<char, DocsError> {
    let mut code = 0u32;
    for _ in 0..digits {
        let (_, digit) = chars.next().ok_or(DocsError::InvalidEscape(at))?;
        code = code * 16 + digit.to_digit(16).ok_or(DocsError::InvalidEscape(at))?;
    }
    char::from_u32(code).ok_or(DocsError::InvalidEscape(at))
}
