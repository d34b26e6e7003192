//! Multi-field dialect: ordinal column followed by id, two short-name fields,
//! and the full name. Two incompatible sub-dialects (quoted and tab-separated)
//! coexist within one format family and are detected per line.

use memchr::{memchr, memchr_iter};

use super::TermParser;

/// Parser for release tables shaped as
/// `ordinal<TAB>id<TAB>short1<TAB>short2<TAB>full name`, where some releases
/// wrap every field in single quotes instead. The sub-dialect is decided per
/// line by the first character after the ordinal column, so a mixed file is
/// accepted line by line rather than rejected wholesale.
pub struct ColumnarTermParser {
    verbose: bool,
}

impl ColumnarTermParser {
    #[must_use]
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Quoted sub-dialect: id is the first quoted field, term the fourth,
    /// i.e. the content between the 7th and 8th quote characters.
    fn extract_quoted(rest: &str) -> Option<(&str, &str)> {
        let mut quotes = memchr_iter(b'\'', rest.as_bytes());
        let mut positions = [0usize; 8];
        for slot in &mut positions {
            *slot = quotes.next()?;
        }
        let id = &rest[positions[0] + 1..positions[1]];
        let term = &rest[positions[6] + 1..positions[7]];
        (!id.is_empty() && !term.is_empty()).then_some((id, term))
    }

    /// Unquoted sub-dialect: plain tab-separated positional fields.
    fn extract_unquoted(rest: &str) -> Option<(&str, &str)> {
        let mut fields = rest.split('\t');
        let id = fields.next()?;
        let term = fields.nth(2)?;
        (!id.is_empty() && !term.is_empty()).then_some((id, term))
    }
}

impl Default for ColumnarTermParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TermParser for ColumnarTermParser {
    fn kind(&self) -> &'static str {
        "columnar"
    }

    fn extract(&self, line: &str) -> Option<(String, String)> {
        let ordinal_end = memchr(b'\t', line.as_bytes())?;
        let rest = &line[ordinal_end + 1..];
        let pair = if rest.starts_with('\'') {
            Self::extract_quoted(rest)
        } else {
            Self::extract_unquoted(rest)
        }?;
        Some((pair.0.to_string(), pair.1.to_string()))
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}
