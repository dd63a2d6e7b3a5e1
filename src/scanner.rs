/// The token classes the scanner can fail to read. Scanner failures carry
/// byte offsets only; the parser turns them into full diagnostics with
/// source context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanErrorKind {
    /// A tilde-terminated field ran past the end of input without a `~`.
    UnterminatedString,
    /// The characters at the cursor did not match the requested class
    /// (signed integer or flag word).
    MalformedToken,
}

/// A scan failure with the byte range it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, pos_start: usize, pos_end: usize) -> ScanError {
        ScanError {
            kind,
            pos_start,
            pos_end,
        }
    }
}

/// A cursor over one area file's text. All reads advance a single byte
/// position; there is no token stream and no lookahead beyond `peek`,
/// because the format's character classes change from field to field.
///
/// Every reader skips leading whitespace (spaces, tabs, line breaks) first;
/// the format separates tokens with arbitrary whitespace runs.
pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.rest().chars().next();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// Consumes `literal` if the input continues with it exactly. No
    /// whitespace is skipped; callers that allow it skip first.
    pub fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Discards everything up to and including the next line break. Rows
    /// that tolerate trailing commentary call this after their last column.
    pub fn skip_rest_of_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Reads a free-text field terminated by `~`. The tilde is consumed but
    /// not returned. Leading whitespace is skipped; interior whitespace,
    /// line breaks and punctuation are kept verbatim. The field may be
    /// empty.
    pub fn read_tilde_string(&mut self) -> Result<String, ScanError> {
        self.skip_whitespace();
        let start = self.position;
        let mut text = String::new();
        loop {
            match self.advance() {
                Some('~') => return Ok(text),
                Some(c) => text.push(c),
                None => {
                    return Err(ScanError::new(
                        ScanErrorKind::UnterminatedString,
                        start,
                        self.position,
                    ))
                }
            }
        }
    }

    /// Reads a signed decimal integer and returns its literal text, sign
    /// included. No numeric conversion happens here; the document keeps the
    /// source spelling of every number.
    pub fn read_integer(&mut self) -> Result<&'a str, ScanError> {
        self.skip_whitespace();
        let start = self.position;
        if self.peek() == Some('-') {
            self.advance();
        }
        let digits_start = self.position;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.position == digits_start {
            let end = self.peek().map_or(self.position, |c| self.position + c.len_utf8());
            return Err(ScanError::new(ScanErrorKind::MalformedToken, start, end));
        }
        Ok(&self.input[start..self.position])
    }

    /// Reads a maximal run of ASCII alphanumerics plus the characters in
    /// `symbols`. Fields disagree on which symbols they tolerate (`|` in
    /// flag vectors, `+` in dice expressions, spaces and quotes in object
    /// value columns), so the extra set is a parameter rather than a
    /// scanner-wide constant. The run must be non-empty.
    pub fn read_flag_word(&mut self, symbols: &str) -> Result<&'a str, ScanError> {
        self.skip_whitespace();
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || symbols.contains(c) {
                self.advance();
            } else {
                break;
            }
        }
        if self.position == start {
            let end = self.peek().map_or(self.position, |c| self.position + c.len_utf8());
            return Err(ScanError::new(ScanErrorKind::MalformedToken, start, end));
        }
        Ok(&self.input[start..self.position])
    }
}
