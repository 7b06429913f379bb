//! A unified C++ lexer, which splits the input bytes into classified code blocks.
//!
//! This lexer is a single pass over the source buffer. It recognises just enough structure of the
//! host language to drive the splitter: comments, literals, preprocessor directives, container
//! keywords, function and constructor names, initialisation lists and group delimiters. It builds
//! no syntax tree and performs no validation beyond what block classification needs; input is
//! assumed to be well-formed C++ apart from the unified-source extension.
//!
//! Blocks are byte ranges into the source buffer, totally ordered and covering every input byte,
//! so concatenating them reproduces the input exactly.

pub mod block;
pub mod container;
pub mod cursor;

mod block_buffer;

pub use block::{BlockKind, CodeBlock};
pub use block_buffer::BlockBuffer;

#[cfg(test)]
mod block_buffer_unittests;
