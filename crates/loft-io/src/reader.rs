//! Line/token reader shared by the three text formats.

use loft_core::{LoftError, Result};

/// Cursor over the significant lines of a document, each pre-split into
/// whitespace-separated tokens.
///
/// Comment lines (`#` prefix), blank lines, and carriage-return-only lines
/// are dropped up front; a trailing `\r` from CRLF input is trimmed per
/// line, so the grammars never see it as a token.
pub struct LineReader<'a> {
    lines: Vec<Vec<&'a str>>,
    pos: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(input: &'a str) -> Self {
        let lines = input
            .lines()
            .map(|line| line.trim_end_matches('\r').trim())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split_whitespace().collect())
            .collect();
        Self { lines, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Next significant line, or `None` at end of input.
    pub fn next_line(&mut self) -> Option<&[&'a str]> {
        let line = self.lines.get(self.pos)?;
        self.pos += 1;
        Some(line)
    }

    /// Next significant line, or a parse error naming `expected`.
    pub fn expect_line(&mut self, expected: &str) -> Result<&[&'a str]> {
        let pos = self.pos;
        self.next_line()
            .ok_or_else(|| LoftError::Parse(format!("unexpected end of input, expected {expected} (line {pos})")))
    }
}

/// Parse one token as `f64`.
pub fn real(token: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|_| LoftError::Parse(format!("expected a real number, got '{token}'")))
}

/// Parse one token as `usize`.
pub fn count(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| LoftError::Parse(format!("expected a count, got '{token}'")))
}

/// Parse a whole line of real numbers.
pub fn reals(tokens: &[&str]) -> Result<Vec<f64>> {
    tokens.iter().map(|t| real(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_comments_blanks_and_cr_lines() {
        let input = "# heading\n\r\n3 1.0\n\n  # indented comment\n4 2.0\r\n";
        let mut reader = LineReader::new(input);
        assert_eq!(reader.next_line(), Some(&["3", "1.0"][..]));
        assert_eq!(reader.next_line(), Some(&["4", "2.0"][..]));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_token_parsers() {
        assert_eq!(count("42").unwrap(), 42);
        assert!(count("x").is_err());
        assert_eq!(real("1.5").unwrap(), 1.5);
        assert!(real("abc").is_err());
        assert_eq!(reals(&["0", "1.5"]).unwrap(), vec![0.0, 1.5]);
    }

    #[test]
    fn test_expect_line_reports_end_of_input() {
        let mut reader = LineReader::new("# only a comment\n");
        assert!(reader.expect_line("a header").is_err());
    }
}
