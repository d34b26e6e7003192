//! Single-delimiter dialect: `id<delim>term`, term runs to end of line.

use memchr::memchr;

use super::TermParser;

/// Parser for sources where each line is an id, one delimiter byte, and the
/// term. Only the first delimiter splits; any later occurrences belong to the
/// term text.
pub struct DelimitedTermParser {
    delimiter: u8,
    verbose: bool,
}

impl DelimitedTermParser {
    #[must_use]
    pub fn new() -> Self {
        Self::with_delimiter(b';')
    }

    #[must_use]
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            verbose: false,
        }
    }
}

impl Default for DelimitedTermParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TermParser for DelimitedTermParser {
    fn kind(&self) -> &'static str {
        "delimited"
    }

    fn extract(&self, line: &str) -> Option<(String, String)> {
        let split = memchr(self.delimiter, line.as_bytes())?;
        let id = &line[..split];
        let term = &line[split + 1..];
        if id.is_empty() || term.is_empty() {
            return None;
        }
        Some((id.to_string(), term.to_string()))
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_delimiter_only() {
        let parser = DelimitedTermParser::new();
        assert_eq!(
            parser.extract("EC 1.1.1.1;alcohol dehydrogenase; NAD+ dependent"),
            Some((
                "EC 1.1.1.1".to_string(),
                "alcohol dehydrogenase; NAD+ dependent".to_string()
            ))
        );
    }

    #[test]
    fn custom_delimiter() {
        let parser = DelimitedTermParser::with_delimiter(b'|');
        assert_eq!(
            parser.extract("PDOC00020|G-protein coupled receptors signature"),
            Some((
                "PDOC00020".to_string(),
                "G-protein coupled receptors signature".to_string()
            ))
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let parser = DelimitedTermParser::new();
        assert!(parser.extract("no delimiter at all").is_none());
        assert!(parser.extract(";term without id").is_none());
        assert!(parser.extract("id without term;").is_none());
        assert!(parser.extract("").is_none());
    }
}
