use std::str::FromStr;

use crate::keyword::Keyword;
use crate::ParseError;

/// Read position inside a single line of the document.
///
/// Every reader either advances past what it recognized and returns it, or
/// leaves the position untouched and returns an `E1001` error pointing at the
/// column where reading started.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    line: &'a str,
    pos: usize,
    line_no: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(line: &'a str, line_no: usize) -> Self {
        Self {
            line,
            pos: 0,
            line_no,
        }
    }

    pub(crate) fn line_no(&self) -> usize {
        self.line_no
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Error at the current position, carrying the whole line as context.
    pub(crate) fn error(&self, code: &'static str, message: impl Into<String>) -> ParseError {
        ParseError::new(code, message, self.line_no)
            .with_column(self.pos)
            .with_context(self.line)
    }

    pub(crate) fn skip_blanks(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t']);
        self.pos += rest.len() - trimmed.len();
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes `c` if it is the next character.
    pub(crate) fn consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Like [`Cursor::consume`], skipping blanks around the character.
    pub(crate) fn expect(&mut self, c: char) -> Result<(), ParseError> {
        let start = self.pos;
        self.skip_blanks();
        if self.consume(c) {
            self.skip_blanks();
            Ok(())
        } else {
            self.pos = start;
            Err(self.error("E1001", format!("expected '{c}'")))
        }
    }

    /// Optional separator: consumed when present, otherwise nothing happens.
    pub(crate) fn consume_separator(&mut self, sep: char) -> bool {
        self.expect(sep).is_ok()
    }

    /// Moves past the first occurrence of `pattern` in the rest of the line.
    pub(crate) fn skip_past(&mut self, pattern: &str) -> bool {
        match self.rest().find(pattern) {
            Some(at) => {
                self.pos += at + pattern.len();
                true
            }
            None => false,
        }
    }

    /// Fails with `E1002` unless only whitespace remains.
    pub(crate) fn expect_end(&mut self) -> Result<(), ParseError> {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            self.pos = self.line.len();
            Ok(())
        } else {
            let at = self.pos + (rest.len() - trimmed.len());
            Err(ParseError::new("E1002", format!("unexpected trailing text: {trimmed}"), self.line_no)
                .with_column(at)
                .with_context(self.line))
        }
    }

    /// Integer prefix the way `strtol` reads it: blanks, optional sign, digits.
    pub(crate) fn parse_int<T: FromStr>(&mut self) -> Result<T, ParseError> {
        let bytes = self.line.as_bytes();
        let mut end = self.blank_end();
        let number_start = end;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let digits = count_digits(&bytes[end..]);
        if digits == 0 {
            return Err(self.error("E1001", "expected an integer"));
        }
        end += digits;

        let text = &self.line[number_start..end];
        let value = text
            .trim_start_matches('+')
            .parse::<T>()
            .map_err(|_| self.error("E1001", format!("integer out of range: {text}")))?;
        self.pos = end;
        Ok(value)
    }

    /// Decimal prefix the way `strtod` reads it, fraction and exponent optional.
    pub(crate) fn parse_float(&mut self) -> Result<f64, ParseError> {
        let bytes = self.line.as_bytes();
        let mut end = self.blank_end();
        let number_start = end;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let int_digits = count_digits(&bytes[end..]);
        end += int_digits;
        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            frac_digits = count_digits(&bytes[end + 1..]);
            if int_digits > 0 || frac_digits > 0 {
                end += 1 + frac_digits;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            return Err(self.error("E1001", "expected a number"));
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = count_digits(&bytes[exp..]);
            if exp_digits > 0 {
                end = exp + exp_digits;
            }
        }

        let text = &self.line[number_start..end];
        let value = text
            .parse::<f64>()
            .map_err(|_| self.error("E1001", format!("invalid number: {text}")))?;
        self.pos = end;
        Ok(value)
    }

    /// Integer followed by `sep`.
    pub(crate) fn int_field<T: FromStr>(&mut self, sep: char) -> Result<T, ParseError> {
        let start = self.pos;
        let value = self.parse_int()?;
        self.expect(sep).inspect_err(|_| self.pos = start)?;
        Ok(value)
    }

    /// Number followed by `sep`.
    pub(crate) fn float_field(&mut self, sep: char) -> Result<f64, ParseError> {
        let start = self.pos;
        let value = self.parse_float()?;
        self.expect(sep).inspect_err(|_| self.pos = start)?;
        Ok(value)
    }

    /// The rest of the line, trimmed. Always succeeds.
    pub(crate) fn parse_string(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.line.len();
        rest.trim()
    }

    /// Text up to (not including) the next `sep` or the end of the line.
    pub(crate) fn parse_until(&mut self, sep: char) -> &'a str {
        let rest = self.rest();
        let len = rest.find(sep).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// A `"`-delimited string closed on the same line.
    pub(crate) fn parse_quoted(&mut self) -> Result<&'a str, ParseError> {
        let start = self.pos;
        self.skip_blanks();
        if !self.consume('"') {
            self.pos = start;
            return Err(self.error("E1001", "expected '\"'"));
        }
        let rest = self.rest();
        match rest.find('"') {
            Some(len) => {
                self.pos += len + 1;
                Ok(&rest[..len])
            }
            None => {
                self.pos = start;
                Err(self.error("E1001", "unterminated quoted string"))
            }
        }
    }

    /// Longest run of ASCII letters at the position, possibly empty.
    pub(crate) fn parse_identifier(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        self.pos += len;
        &rest[..len]
    }

    /// Identifier that must name a known keyword (`E1003` otherwise).
    pub(crate) fn parse_keyword(&mut self) -> Result<Keyword, ParseError> {
        let start = self.pos;
        self.skip_blanks();
        let word = self.parse_identifier();
        match Keyword::lookup(word) {
            Some(keyword) => Ok(keyword),
            None => {
                self.pos = start;
                let shown = if word.is_empty() { self.rest().trim() } else { word };
                Err(self.error("E1003", format!("unknown key: {shown}")))
            }
        }
    }

    fn blank_end(&self) -> usize {
        let rest = self.rest();
        self.pos + (rest.len() - rest.trim_start_matches([' ', '\t']).len())
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
