use alloc::boxed::Box;
use alloc::string::String;

use crate::{Result, Source};

/// Terminates tag names and attribute tokens at `=`.
pub const DELIMS_WITH_EQUALS: &[char] = &['=', '>', '<', '?', ' ', '\r', '\n', '\t'];
/// Terminates tag names at `/` so `<a/>` splits into `a` and `/>`.
pub const DELIMS_WITH_SLASH: &[char] = &['/', '>', '<', '?', ' ', '\r', '\n', '\t'];

/// Whitespace as the C locale sees it, including vertical tab and form feed.
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// One character lookahead cursor over a [`Source`].
///
/// `current` is the character most recently read, `None` once the source is
/// exhausted. `offset` counts characters read so far, so the current
/// character sits at `offset - 1`.
#[derive(Default)]
pub struct Scanner<'a> {
    source: Option<Box<dyn Source + 'a>>,
    current: Option<char>,
    offset: usize,
    token: String,
}

impl<'a> Scanner<'a> {
    pub fn new(source: Box<dyn Source + 'a>) -> Self {
        Scanner {
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn current(&self) -> Option<char> {
        self.current
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The token extracted by the last [`Scanner::next_token`] call.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn take_token(&mut self) -> String {
        core::mem::take(&mut self.token)
    }

    pub fn len(&self) -> usize {
        self.source.as_ref().map_or(0, |source| source.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when there is no current character and the source is drained.
    pub fn at_end(&self) -> bool {
        self.current.is_none() && self.source.as_ref().is_none_or(|source| source.at_end())
    }

    pub(crate) fn is(&self, c: char) -> bool {
        self.current == Some(c)
    }

    /// Reads the next character. Returns false at the end of the input.
    pub fn advance(&mut self) -> Result<bool> {
        self.current = None;
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        let Some(c) = source.read_char()? else {
            return Ok(false);
        };
        self.current = Some(c);
        self.offset += 1;
        Ok(true)
    }

    pub(crate) fn skip_whitespace(&mut self) -> Result<()> {
        while self.current.is_some_and(is_space) {
            self.advance()?;
        }
        Ok(())
    }

    /// Extracts the next token, either quoted with `"` or `'` or running up
    /// to one of `delims`. Surrounding whitespace is skipped.
    ///
    /// Returns false only if the token is empty and the source has no more
    /// characters to read, even if the last one is still current.
    pub fn next_token(&mut self, delims: &[char]) -> Result<bool> {
        self.token.clear();
        self.skip_whitespace()?;

        match self.current {
            Some(quote @ ('"' | '\'')) => {
                self.advance()?;
                while let Some(c) = self.current.filter(|&c| c != quote) {
                    self.token.push(c);
                    self.advance()?;
                }
                if self.is(quote) {
                    self.advance()?;
                }
            }
            _ => {
                while let Some(c) = self.current.filter(|c| !delims.contains(c)) {
                    self.token.push(c);
                    self.advance()?;
                }
            }
        }

        self.skip_whitespace()?;
        trace!("token \"{}\"", self.token);

        Ok(!(self.token.is_empty() && self.source_drained()))
    }

    fn source_drained(&self) -> bool {
        self.source.as_ref().is_none_or(|source| source.at_end())
    }

    /// Skips up to and including the three character `terminator`,
    /// starting at the current character. The character after the
    /// terminator becomes current, if there is one.
    pub(crate) fn skip_past(&mut self, terminator: [char; 3]) -> Result<bool> {
        let mut window = [None; 3];
        loop {
            let Some(c) = self.current else {
                return Ok(false);
            };
            window = [window[1], window[2], Some(c)];
            if window == terminator.map(Some) {
                self.advance()?;
                return Ok(true);
            }
            self.advance()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySource;

    fn scanner(data: &[u8]) -> Scanner<'_> {
        let mut scanner = Scanner::new(Box::new(MemorySource::new(data)));
        scanner.advance().unwrap();
        scanner
    }

    #[test]
    fn unquoted_tokens() {
        let mut s = scanner(b"  name = value>");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "name");
        assert!(s.is('='));
        s.advance().unwrap();
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "value");
        assert!(s.is('>'));
    }

    #[test]
    fn quoted_tokens() {
        let mut s = scanner(br#""a b>c" 'd"e' "unterminated"#);
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "a b>c");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "d\"e");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "unterminated");
        assert_eq!(s.current(), None);
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(false));
    }

    #[test]
    fn empty_token_before_delimiter() {
        let mut s = scanner(b">>");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "");
        assert!(s.is('>'));
    }

    #[test]
    fn empty_token_on_last_character() {
        let mut s = scanner(b">");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(false));
        assert_eq!(s.token(), "");
        assert!(s.is('>'));

        let mut s = scanner(b"a>");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "a");
    }

    #[test]
    fn slash_delimiter() {
        let mut s = scanner(b"a/>");
        assert_eq!(s.next_token(DELIMS_WITH_SLASH), Ok(true));
        assert_eq!(s.token(), "a");
        assert!(s.is('/'));

        let mut s = scanner(b"a/>");
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(true));
        assert_eq!(s.token(), "a/");
    }

    #[test]
    fn offsets() {
        let mut s = scanner(b"ab");
        assert_eq!(s.offset(), 1);
        assert_eq!(s.current(), Some('a'));
        assert_eq!(s.advance(), Ok(true));
        assert_eq!(s.offset(), 2);
        assert_eq!(s.advance(), Ok(false));
        assert_eq!(s.offset(), 2);
        assert_eq!(s.current(), None);
        assert!(s.at_end());
    }

    #[test]
    fn skip_past_terminator() {
        let mut s = scanner(b" a - -- --->x");
        assert_eq!(s.skip_past(['-', '-', '>']), Ok(true));
        assert_eq!(s.current(), Some('x'));

        let mut s = scanner(b"]]]>");
        assert_eq!(s.skip_past([']', ']', '>']), Ok(true));
        assert_eq!(s.current(), None);

        let mut s = scanner(b"]] >");
        assert_eq!(s.skip_past([']', ']', '>']), Ok(false));
    }

    #[test]
    fn no_source() {
        let mut s = Scanner::default();
        assert_eq!(s.advance(), Ok(false));
        assert_eq!(s.next_token(DELIMS_WITH_EQUALS), Ok(false));
        assert!(s.is_empty());
        assert!(s.at_end());
    }
}
