//! Unified C++ source splitter.
//!
//! cppx converts unified C++ source files (`.cppx`), where declarations and their definitions
//! live together in one document, into a declaration-only `.h` interface file and a `.cpp`
//! implementation file suitable for conventional separate compilation. The core is a single-pass
//! lexer that classifies every byte of the input into tagged code blocks, and a generator that
//! routes those blocks between the two outputs, relocating function bodies behind qualified
//! scope prefixes.
//!

#[macro_use]
extern crate static_assertions;

pub mod console;
pub mod driver;
pub mod toolchain;
