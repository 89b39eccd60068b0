use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::node::OpenElement;
use crate::scanner::{DELIMS_WITH_EQUALS, DELIMS_WITH_SLASH, Scanner, is_space};
use crate::{Attribute, Error, MemorySource, Node, Result, Source};

/// A pull XML parser.
///
/// Start a session with one of the `begin_from_*` functions, then call
/// [`Parser::next_node`] until it returns `Ok(None)`. The parser keeps a
/// stack of open elements: end tags must match the innermost begin tag, and
/// self-closing tags (`<x/>`, `<?x?>`) are followed by a synthesized
/// [`Node::End`].
///
/// Any error is fatal to the session. It is returned once and stays
/// available through [`Parser::last_error`]; later calls report the end of
/// the document.
#[derive(Default)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    stack: Vec<OpenElement>,
    prior_was_empty_tag: bool,
    last_error: Option<Error>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts parsing the file at `path`.
    #[cfg(feature = "std")]
    pub fn begin_from_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.reset();
        match crate::FileSource::open(path) {
            Ok(source) => self.begin(Box::new(source)),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Starts parsing a document held in memory. `data` is borrowed for the
    /// whole session.
    /// ```
    /// # use stack_xml::{Parser, Node};
    /// let mut parser = Parser::new();
    /// parser.begin_from_memory(b"<a/>").unwrap();
    /// assert!(matches!(parser.next_node(), Ok(Some(Node::Begin { .. }))));
    /// assert!(matches!(parser.next_node(), Ok(Some(Node::End { .. }))));
    /// assert_eq!(parser.next_node(), Ok(None));
    /// ```
    pub fn begin_from_memory(&mut self, data: &'a [u8]) -> Result<()> {
        self.reset();
        self.begin(Box::new(MemorySource::new(data)))
    }

    /// Starts parsing from a copy of `source`. The caller keeps the original.
    pub fn begin_from_source<S: Source + 'a>(&mut self, source: &S) -> Result<()> {
        self.reset();
        match source.try_clone() {
            Ok(copy) => self.begin(Box::new(copy)),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn begin(&mut self, mut source: Box<dyn Source + 'a>) -> Result<()> {
        if let Err(e) = source.seek(0) {
            return Err(self.fail(e));
        }
        debug!("Begin parsing document of {} characters", source.len());
        self.scanner = Scanner::new(source);
        match self.scanner.advance() {
            Ok(true) => Ok(()),
            Ok(false) => Err(self.fail(Error::EmptyDocument)),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Closes the source and clears all state. Safe to call repeatedly.
    pub fn reset(&mut self) {
        *self = Parser::default();
    }

    /// The error that ended the session, if any.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Description of the last error, empty if there was none.
    pub fn error_info(&self) -> String {
        self.last_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Number of characters consumed so far.
    pub fn offset(&self) -> usize {
        self.scanner.offset()
    }

    pub fn document_len(&self) -> usize {
        self.scanner.len()
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn end_of_document(&self) -> bool {
        self.scanner.at_end()
    }

    /// Parses the next node.
    ///
    /// Returns `Ok(None)` once the document is exhausted or after a fatal
    /// error has been reported. Check [`Parser::last_error`] to tell the two
    /// apart.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        if self.last_error.is_some() {
            return Ok(None);
        }
        self.parse_node().map_err(|e| self.fail(e))
    }

    fn fail(&mut self, error: Error) -> Error {
        debug!("Parse error near offset {}: {error}", self.scanner.offset());
        self.last_error = Some(error.clone());
        error
    }

    fn parse_node(&mut self) -> Result<Option<Node>> {
        // The previous begin tag closed itself.
        if self.prior_was_empty_tag {
            self.prior_was_empty_tag = false;
            if let Some(element) = self.stack.pop() {
                trace!("Synthesized end of '{}'", element.name);
                return Ok(Some(element.into_end_node()));
            }
        }

        loop {
            let mut text = String::new();
            while let Some(c) = self.scanner.current().filter(|&c| is_space(c)) {
                text.push(c);
                self.scanner.advance()?;
            }

            if !self.scanner.is('<') {
                return self.parse_value(text);
            }

            let tag_offset = self.scanner.offset() - 1;
            self.scanner.advance()?;
            match self.scanner.current() {
                Some('/') => return self.parse_end_tag().map(Some),
                Some('!') => self.skip_bang_tag()?,
                _ => return self.parse_begin_tag(tag_offset).map(Some),
            }
        }
    }

    /// Text up to the next tag. `text` holds the whitespace already read.
    fn parse_value(&mut self, mut text: String) -> Result<Option<Node>> {
        while let Some(c) = self.scanner.current().filter(|&c| c != '<') {
            text.push(c);
            self.scanner.advance()?;
        }

        let Some(element) = self.stack.last() else {
            if !text.chars().all(is_space) {
                return Err(Error::UnexpectedContentOutsideTags(text));
            }
            trace!("End of document at {}", self.scanner.offset());
            return Ok(None);
        };

        if text.is_empty() && self.scanner.current().is_none() {
            return Err(Error::UnexpectedEndOfInput);
        }
        Ok(Some(element.value_node(text)))
    }

    /// Expects the `/` of `</` as the current character.
    fn parse_end_tag(&mut self) -> Result<Node> {
        self.scanner.advance()?;
        if !self.scanner.next_token(DELIMS_WITH_EQUALS)? {
            return Err(Error::UnexpectedEndOfInput);
        }
        if !self.scanner.is('>') {
            return Err(Error::ExpectedCharacter('>'));
        }
        self.scanner.advance()?;

        let name = self.scanner.take_token();
        let Some(element) = self.stack.last() else {
            return Err(Error::UnbalancedEndTag(name));
        };
        if element.name != name {
            return Err(Error::MismatchedEndTag {
                found: name,
                expected: element.name.clone(),
            });
        }

        match self.stack.pop() {
            Some(element) => Ok(element.into_end_node()),
            None => Err(Error::UnbalancedEndTag(name)),
        }
    }

    /// Skips a comment or marked section. Expects the `!` of `<!` as the
    /// current character.
    fn skip_bang_tag(&mut self) -> Result<()> {
        self.scanner.advance()?;
        let kind = self.scanner.current();
        self.scanner.advance()?;

        let terminator = match kind {
            Some('[') => [']', ']', '>'],
            Some('-') if self.scanner.is('-') => {
                self.scanner.advance()?;
                ['-', '-', '>']
            }
            None => return Err(Error::UnexpectedEndOfInput),
            _ => return Err(Error::MalformedTag),
        };
        if !self.scanner.skip_past(terminator)? {
            return Err(Error::UnexpectedEndOfInput);
        }
        Ok(())
    }

    /// Parses one of
    /// - `<name [attr[=value] ...] [/]>`
    /// - `<?name [attr[=value] ...] ?>`
    /// - `<?name [attr[=value] ...] ?/>`, which shows up in the wild
    ///
    /// The character after `<` is current.
    fn parse_begin_tag(&mut self, offset: usize) -> Result<Node> {
        let question_marked = self.scanner.is('?');
        if question_marked {
            self.scanner.advance()?;
        }

        if !self.scanner.next_token(DELIMS_WITH_SLASH)? {
            return Err(Error::UnexpectedEndOfInput);
        }
        let name = self.scanner.take_token();

        let mut attributes = Vec::new();
        while !matches!(self.scanner.current(), Some('/' | '>' | '?')) {
            let start = self.scanner.offset();
            if !self.scanner.next_token(DELIMS_WITH_EQUALS)? {
                return Err(Error::UnexpectedEndOfInput);
            }
            let name = self.scanner.take_token();

            let value = if self.scanner.is('=') {
                self.scanner.advance()?;
                self.scanner.next_token(DELIMS_WITH_EQUALS)?;
                Some(self.scanner.take_token())
            } else if self.scanner.offset() == start {
                // Stuck on a delimiter that can't appear inside a tag.
                return Err(Error::ExpectedCharacter('>'));
            } else {
                None
            };
            attributes.push(Attribute { name, value });
        }

        let mut self_closing = false;
        if question_marked {
            if !self.scanner.is('?') {
                return Err(Error::ExpectedCharacter('?'));
            }
            self.scanner.advance()?;
            self_closing = true;
        }
        if self.scanner.is('/') {
            self.scanner.advance()?;
            self_closing = true;
        }

        if !self.scanner.is('>') {
            return Err(Error::ExpectedCharacter('>'));
        }
        self.scanner.advance()?;

        let element = OpenElement {
            name,
            offset,
            attributes,
        };
        let node = element.begin_node();
        self.stack.push(element);
        self.prior_was_empty_tag = self_closing;
        Ok(node)
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn depth_follows_nesting() {
        let mut parser = Parser::new();
        parser.begin_from_memory(b"<a><b/></a>").unwrap();
        assert_eq!(parser.depth(), 0);
        parser.next_node().unwrap();
        assert_eq!(parser.depth(), 1);
        parser.next_node().unwrap();
        assert_eq!(parser.depth(), 2);
        parser.next_node().unwrap();
        assert_eq!(parser.depth(), 1);
        parser.next_node().unwrap();
        assert_eq!(parser.depth(), 0);
        assert_eq!(parser.next_node(), Ok(None));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut parser = Parser::new();
        parser.begin_from_memory(b"<a>").unwrap();
        parser.next_node().unwrap();
        parser.reset();
        parser.reset();
        assert_eq!(parser.depth(), 0);
        assert_eq!(parser.offset(), 0);
        assert_eq!(parser.document_len(), 0);
        assert!(parser.end_of_document());
        assert_eq!(parser.next_node(), Ok(None));
    }

    #[test]
    fn begin_clears_previous_session() {
        let mut parser = Parser::new();
        parser.begin_from_memory(b"<a></b>").unwrap();
        parser.next_node().unwrap();
        assert!(parser.next_node().is_err());
        assert!(parser.last_error().is_some());

        parser.begin_from_memory(b"<c/>").unwrap();
        assert!(parser.last_error().is_none());
        assert_eq!(parser.error_info(), "");
        let names: Vec<_> = parser.map(|node| node.unwrap().name().to_string()).collect();
        assert_eq!(names, vec!["c", "c"]);
    }

    fn drain(parser: &mut Parser<'_>) -> usize {
        while let Ok(Some(_)) = parser.next_node() {}
        parser.offset()
    }

    #[test]
    fn offset_through_iterating_parser() {
        let mut parser = Parser::new();
        parser.begin_from_memory(b"<a><b x=\"1\"/></a>  ").unwrap();
        assert_eq!(parser.by_ref().nth(1), Some(Ok(Node::Begin {
            name: "b".into(),
            offset: 3,
            attributes: vec![Attribute::new("x", Some("1"))],
        })));
        assert_eq!(drain(&mut parser), 19);
        assert!(parser.last_error().is_none());
    }

    #[test]
    fn stuck_attribute() {
        let mut parser = Parser::new();
        parser.begin_from_memory(b"<a b <c>").unwrap();
        assert_eq!(parser.next_node(), Err(Error::ExpectedCharacter('>')));
    }
}
