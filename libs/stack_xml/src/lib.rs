/*!
A no_std pull XML parser that tracks the stack of open elements.

## Features
- no_std (with alloc)
- pull style, one node per call
- self-closing tags produce a synthesized end node
- pluggable character sources (memory, file, embedded-io)

## Usage
```
# use stack_xml as xml;
# fn main() -> Result<(), xml::Error> {
let data = b"<note><to lang=\"en\">Mary</to></note>";
let mut parser = xml::Parser::new();
parser.begin_from_memory(data)?;
while let Some(node) = parser.next_node()? {
    match node {
        xml::Node::Begin { name, offset, attributes } => {
            println!("Begin {name} at {offset} with {attributes:?}");
        }
        xml::Node::Value { name, text } => println!("Value of {name}: {text}"),
        xml::Node::End { name } => println!("End {name}"),
    }
}
assert!(parser.last_error().is_none());
# Ok(())
# }
```

## Limitations & non-goals
- single byte characters only, no encoding conversion
- no entity decoding
- no DTD support, `<!DOCTYPE ...>` is rejected
- CDATA and other marked sections are skipped
- no DOM
*/

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

mod error;
#[cfg(feature = "std")]
mod file;
mod node;
mod parser;
mod scanner;
mod source;


pub use error::Error;
#[cfg(feature = "std")]
pub use file::FileSource;
pub use node::{Attribute, Node};
pub use parser::Parser;
pub use scanner::{DELIMS_WITH_EQUALS, DELIMS_WITH_SLASH, Scanner};
pub use source::{IoSource, MemorySource, Source};

pub type Result<T> = core::result::Result<T, Error>;
