use bstr::BStr;

/// A single classified region of the source buffer.
///
/// Blocks carry an inclusive `[begin, end]` byte range, so a single-byte block has
/// `begin == end`. The lexer guarantees that blocks are ordered by `begin`, never overlap, and
/// cover the buffer without gaps; bytes it does not classify are carried through in
/// [BlockKind::Other] blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    /// The kind of block.
    pub kind: BlockKind,

    // Offset of the first byte of the block.
    pub begin: usize,

    // Offset of the last byte of the block, inclusive.
    pub end: usize,
}

assert_eq_size!(CodeBlock, [usize; 3]);

impl CodeBlock {
    pub fn new(kind: BlockKind, begin: usize, end: usize) -> CodeBlock {
        CodeBlock { kind, begin, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin + 1
    }

    pub fn bytes<'s>(&self, code: &'s [u8]) -> &'s [u8] {
        &code[self.begin..=self.end]
    }

    /// The block bytes as a byte string, for comparison and display.
    pub fn text<'s>(&self, code: &'s [u8]) -> &'s BStr {
        BStr::new(self.bytes(code))
    }
}

/// An enumeration of all block classifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// Bytes not classified as any structural token, carried through verbatim.
    Other,

    /// A run of blank space.
    Empty,

    /// A `/* */` comment including trailing blank space, or one or more adjacent `//` lines.
    Comment,

    /// A preprocessor directive line starting with `#`.
    Directive,

    /// A single-quoted character literal, escapes included.
    CharLiteral,

    /// A double-quoted string literal; raw strings are supported.
    StringLiteral,

    /// A non-keyword word. After merging this may span a scoped path such as `a::b::c`.
    Identifier,

    /// A literal `::`.
    IdentifierScope,

    /// `public`, `protected` or `private` merged together with its trailing `:`.
    AccessModifier,

    NamespaceKeyword,

    ClassKeyword,

    StructKeyword,

    EnumKeyword,

    /// A parenthesised run at the top level of a function signature or call.
    ArgumentsOrParameters,

    /// An [BlockKind::Identifier] found immediately before `(` outside a function context.
    FunctionName,

    /// A [BlockKind::FunctionName] whose text equals the name of the enclosing container.
    ConstructorDestructor,

    /// The `:` introducing a constructor initialisation list, together with the comma-separated
    /// member initialisers that follow it.
    InitializationList,

    /// `{`, together with any blank space directly in front of it.
    BeginGroup,

    /// `}`.
    EndGroup,

    /// `;`.
    StatementTerminator,
}
