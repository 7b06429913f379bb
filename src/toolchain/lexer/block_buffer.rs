use crate::toolchain::diagnostics::{LexError, LexErrorKind};

use super::block::{BlockKind, CodeBlock};
use super::container::{Container, ContainerKind};
use super::cursor::Cursor;

/// The classified output of lexing one unified source file.
///
/// Owns the block vector; the blocks index into the caller's source buffer, which must outlive
/// this object.
#[derive(Debug)]
pub struct BlockBuffer<'s> {
    code: &'s [u8],
    blocks: Vec<CodeBlock>,
}

impl<'s> BlockBuffer<'s> {
    /// Runs the lexer over `code`. On success the returned blocks are ordered, non-overlapping
    /// and cover every byte of the input exactly once.
    pub fn lex(code: &'s [u8]) -> Result<BlockBuffer<'s>, LexError> {
        let mut lexer = Lexer::new(code);
        lexer.run()?;
        Ok(BlockBuffer { code, blocks: lexer.blocks })
    }

    pub fn blocks(&self) -> &[CodeBlock] {
        &self.blocks
    }

    pub fn code(&self) -> &'s [u8] {
        self.code
    }
}

/// What the dispatcher asks the block inserter to do for the bytes it consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Insert {
    /// Leave the bytes to the gap in front of the next block.
    None,

    /// Extend the previous block, whatever its kind. Used when an initialisation list closes so
    /// contiguous material keeps coalescing.
    Continue,

    /// Append a block of the given kind.
    Block(BlockKind),
}

struct Lexer<'s> {
    code: &'s [u8],
    cursor: Cursor<'s>,
    blocks: Vec<CodeBlock>,
    containers: Vec<Container>,
    next_container: ContainerKind,
    last_identifier: Option<(usize, usize)>,
    container_name: Option<(usize, usize)>,
}

impl<'s> Lexer<'s> {
    fn new(code: &'s [u8]) -> Lexer<'s> {
        Lexer {
            code,
            cursor: Cursor::new(code),
            blocks: Vec::new(),
            containers: vec![Container::sentinel()],
            next_container: ContainerKind::None,
            last_identifier: None,
            container_name: None,
        }
    }

    fn run(&mut self) -> Result<(), LexError> {
        while !self.cursor.at_end() {
            let begin = self.cursor.index();
            match self.dispatch()? {
                Insert::None => self.cursor.move_next(),
                insert => self.insert_block(insert, begin),
            }
        }
        // Flush any trailing gap.
        self.insert_tail();
        Ok(())
    }

    fn dispatch(&mut self) -> Result<Insert, LexError> {
        match self.cursor.value() {
            b'\'' => {
                self.char_literal()?;
                Ok(Insert::Block(BlockKind::CharLiteral))
            }

            b'"' => {
                self.string_literal()?;
                Ok(Insert::Block(BlockKind::StringLiteral))
            }

            b'#' => {
                self.directive();
                Ok(Insert::Block(BlockKind::Directive))
            }

            b';' => {
                self.cursor.move_next();
                Ok(Insert::Block(BlockKind::StatementTerminator))
            }

            b'{' => {
                self.cursor.move_next();
                if self.next_container == ContainerKind::None
                    || self.top().kind == ContainerKind::InitializationList
                {
                    self.top_mut().braces += 1;
                } else {
                    let container =
                        Container::new(self.next_container, self.container_name, 1);
                    self.containers.push(container);
                    self.next_container = ContainerKind::None;
                    self.container_name = None;
                }
                Ok(Insert::Block(BlockKind::BeginGroup))
            }

            b'}' => {
                if self.top().braces == 0 {
                    return Err(self.error(LexErrorKind::UnbalancedBrace));
                }
                self.top_mut().braces -= 1;
                let top = *self.top();
                let insert = if top.kind == ContainerKind::InitializationList {
                    if top.braces == 0 && top.parenthesis == 0 {
                        self.containers.pop();
                    }
                    Insert::Continue
                } else {
                    if top.braces == 0 && self.containers.len() > 1 {
                        self.containers.pop();
                    }
                    Insert::Block(BlockKind::EndGroup)
                };
                self.cursor.move_next();
                Ok(insert)
            }

            b'/' => {
                if self.comments()? {
                    Ok(Insert::Block(BlockKind::Comment))
                } else {
                    Ok(Insert::None)
                }
            }

            b'(' => {
                match self.top().kind {
                    ContainerKind::Function | ContainerKind::InitializationList => {}
                    _ => self.promote_function_name(),
                }
                self.top_mut().parenthesis += 1;
                self.cursor.move_next();
                Ok(Insert::Block(BlockKind::ArgumentsOrParameters))
            }

            b')' => {
                if self.top().parenthesis == 0 {
                    return Err(self.error(LexErrorKind::UnbalancedParen));
                }
                self.top_mut().parenthesis -= 1;
                let top = *self.top();
                let insert = if top.kind == ContainerKind::InitializationList {
                    if top.braces == 0 && top.parenthesis == 0 {
                        self.containers.pop();
                    }
                    Insert::Continue
                } else {
                    Insert::Block(BlockKind::ArgumentsOrParameters)
                };
                self.cursor.move_next();
                Ok(insert)
            }

            b',' => {
                let mut insert = Insert::None;
                if self.top().kind != ContainerKind::InitializationList
                    && self.last_significant_kind() == Some(BlockKind::InitializationList)
                {
                    insert = Insert::Block(BlockKind::InitializationList);
                    self.containers.push(Container::new(
                        ContainerKind::InitializationList,
                        None,
                        0,
                    ));
                }
                self.cursor.move_next();
                Ok(insert)
            }

            b':' => {
                if self.cursor.next() == b':' {
                    self.cursor.move_next();
                    Ok(Insert::Block(BlockKind::IdentifierScope))
                } else if self.next_container == ContainerKind::ConstructorDestructor {
                    self.containers.push(Container::new(
                        ContainerKind::InitializationList,
                        None,
                        0,
                    ));
                    Ok(Insert::Block(BlockKind::InitializationList))
                } else if self.last_identifier_is_access_modifier() {
                    Ok(Insert::Block(BlockKind::AccessModifier))
                } else {
                    Ok(Insert::None)
                }
            }

            c if c == b'_' || c.is_ascii_alphabetic() => Ok(self.identifier()),

            c if is_blank_space(c) => {
                self.blank_space();
                Ok(Insert::Block(BlockKind::Empty))
            }

            _ => Ok(Insert::None),
        }
    }

    fn top(&self) -> &Container {
        self.containers.last().unwrap()
    }

    fn top_mut(&mut self) -> &mut Container {
        self.containers.last_mut().unwrap()
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError::at(kind, self.cursor.line(), &self.code[self.cursor.index()..])
    }

    fn error_at(&self, kind: LexErrorKind, line: u32, index: usize) -> LexError {
        LexError::at(kind, line, &self.code[index..])
    }

    /// Indices of blocks from the tail that carry structure, skipping blank space and comments.
    fn significant_rev(&self) -> impl Iterator<Item = usize> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, block)| !matches!(block.kind, BlockKind::Empty | BlockKind::Comment))
            .map(|(index, _)| index)
    }

    fn last_significant_kind(&self) -> Option<BlockKind> {
        self.significant_rev().next().map(|index| self.blocks[index].kind)
    }

    fn last_identifier_is_access_modifier(&self) -> bool {
        match self.last_identifier {
            Some((begin, end)) => matches!(
                &self.code[begin..=end],
                b"public" | b"protected" | b"private"
            ),
            None => false,
        }
    }

    /// An identifier directly in front of `(` becomes a function name, or a constructor or
    /// destructor name when its text equals the name of the enclosing container.
    fn promote_function_name(&mut self) {
        let index = match self.significant_rev().next() {
            Some(index) if self.blocks[index].kind == BlockKind::Identifier => index,
            _ => return,
        };
        let is_container_name = match self.top().name {
            Some((begin, end)) => {
                self.code[begin..=end] == *self.blocks[index].bytes(self.code)
            }
            None => false,
        };
        if is_container_name {
            self.blocks[index].kind = BlockKind::ConstructorDestructor;
            self.next_container = ContainerKind::ConstructorDestructor;
        } else {
            self.blocks[index].kind = BlockKind::FunctionName;
            self.next_container = ContainerKind::Function;
        }
        self.container_name = self.last_identifier;
    }

    fn identifier(&mut self) -> Insert {
        let begin = self.cursor.index();
        self.cursor.move_next();
        while is_word_byte(self.cursor.value()) {
            self.cursor.move_next();
        }
        let end = self.cursor.index() - 1;
        match &self.code[begin..=end] {
            b"class" => {
                self.next_container = ContainerKind::Class;
                self.container_name = None;
                Insert::Block(BlockKind::ClassKeyword)
            }
            b"enum" => {
                self.next_container = ContainerKind::Enum;
                self.container_name = None;
                Insert::Block(BlockKind::EnumKeyword)
            }
            b"namespace" => {
                self.next_container = ContainerKind::Namespace;
                self.container_name = None;
                Insert::Block(BlockKind::NamespaceKeyword)
            }
            b"struct" => {
                self.next_container = ContainerKind::Struct;
                self.container_name = None;
                Insert::Block(BlockKind::StructKeyword)
            }
            _ => {
                self.last_identifier = Some((begin, end));
                if self.container_name.is_none() {
                    self.container_name = Some((begin, end));
                }
                Insert::Block(BlockKind::Identifier)
            }
        }
    }

    fn blank_space(&mut self) {
        while is_blank_space(self.cursor.next()) {}
    }

    fn char_literal(&mut self) -> Result<(), LexError> {
        match self.cursor.next() {
            b'\'' => return Err(self.error(LexErrorKind::EmptyCharLiteral)),
            b'\\' => self.escape_sequence()?,
            _ => self.cursor.move_next(),
        }
        if self.cursor.value() != b'\'' {
            return Err(self.error(LexErrorKind::UnterminatedCharLiteral));
        }
        self.cursor.move_next();
        Ok(())
    }

    /// Consumes one escape sequence; the cursor is on the backslash. A failed match reports at
    /// the character following the backslash and consumes nothing beyond it.
    fn escape_sequence(&mut self) -> Result<(), LexError> {
        self.cursor.move_next();
        let consumed = match self.cursor.value() {
            b'\'' | b'"' | b'?' | b'\\' | b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' => {
                self.cursor.move_next();
                true
            }
            b'x' => self.fixed_digits(2, u8::is_ascii_hexdigit),
            b'u' => self.fixed_digits(4, u8::is_ascii_hexdigit),
            b'U' => self.fixed_digits(8, u8::is_ascii_hexdigit),
            b'0'..=b'7' => self.octal_digits(),
            _ => false,
        };
        if consumed {
            Ok(())
        } else {
            Err(self.error(LexErrorKind::InvalidEscapeSequence))
        }
    }

    /// Consumes the introducer byte under the cursor plus exactly `count` digits, or nothing.
    fn fixed_digits(&mut self, count: usize, digit: impl Fn(&u8) -> bool) -> bool {
        let start = self.cursor.index();
        for i in 1..=count {
            match self.code.get(start + i) {
                Some(b) if digit(b) => {}
                _ => return false,
            }
        }
        self.cursor.advance(count + 1);
        true
    }

    /// Consumes exactly three octal digits starting under the cursor, or nothing.
    fn octal_digits(&mut self) -> bool {
        let start = self.cursor.index();
        for i in 0..3 {
            match self.code.get(start + i) {
                Some(b'0'..=b'7') => {}
                _ => return false,
            }
        }
        self.cursor.advance(3);
        true
    }

    fn string_literal(&mut self) -> Result<(), LexError> {
        let is_raw_string = self.cursor.previous_value() == b'R';
        let start_line = self.cursor.line();
        let start_index = self.cursor.index();

        self.cursor.move_next();

        if is_raw_string {
            if !self.raw_string_body() {
                return Err(self.error_at(LexErrorKind::InvalidRawString, start_line, start_index));
            }
            return Ok(());
        }

        loop {
            if !self.cursor.advance_until_any(b"\\\"\n") {
                return Err(self.error_at(
                    LexErrorKind::UnterminatedString,
                    start_line,
                    start_index,
                ));
            }
            match self.cursor.value() {
                b'"' => {
                    self.cursor.move_next();
                    return Ok(());
                }
                b'\\' => self.escape_sequence()?,
                _ => {
                    return Err(self.error_at(
                        LexErrorKind::UnterminatedString,
                        start_line,
                        start_index,
                    ))
                }
            }
        }
    }

    /// Matches `delimiter ( content ) delimiter "` after the opening quote. The delimiter is at
    /// most 16 bytes and excludes parentheses, backslashes and blank space; the content never
    /// crosses a line break.
    fn raw_string_body(&mut self) -> bool {
        let delimiter_start = self.cursor.index();
        loop {
            match self.cursor.value() {
                b'(' => break,
                0 | b')' | b'\\' => return false,
                c if is_blank_space(c) => return false,
                _ => {
                    if self.cursor.index() - delimiter_start >= 16 {
                        return false;
                    }
                    self.cursor.move_next();
                }
            }
        }
        let delimiter_end = self.cursor.index();
        self.cursor.move_next();
        loop {
            match self.cursor.value() {
                0 | b'\n' => return false,
                b')' => {
                    let after = self.cursor.index() + 1;
                    let delimiter = &self.code[delimiter_start..delimiter_end];
                    let closes = self
                        .code
                        .get(after..after + delimiter.len())
                        .map_or(false, |tail| tail == delimiter)
                        && self.code.get(after + delimiter.len()) == Some(&b'"');
                    if closes {
                        self.cursor.advance(delimiter.len() + 2);
                        return true;
                    }
                    self.cursor.move_next();
                }
                _ => self.cursor.move_next(),
            }
        }
    }

    /// Consumes a directive to the end of the line. A block comment opening on the same line is
    /// absorbed if it also closes there; otherwise the directive ends just before `/*` and the
    /// comment is lexed separately.
    fn directive(&mut self) {
        self.cursor.move_next();
        if let Some(open) = self.find_in_line(b"/*") {
            while self.cursor.index() < open + 2 {
                self.cursor.move_next();
            }
            if let Some(close) = self.find_in_line(b"*/") {
                while self.cursor.index() < close + 2 {
                    self.cursor.move_next();
                }
                while !matches!(self.cursor.value(), 0 | b'\n') {
                    self.cursor.move_next();
                }
            } else {
                self.cursor.move_back(2);
            }
        } else if self.cursor.advance_until(b'\n') {
            self.cursor.move_next();
        }
    }

    /// Finds `needle` between the cursor and the end of the current line.
    fn find_in_line(&self, needle: &[u8]) -> Option<usize> {
        let from = self.cursor.index();
        let line_end = find(self.code, from, b"\n").unwrap_or(self.code.len());
        let position = find(self.code, from, needle)?;
        (position + needle.len() <= line_end).then_some(position)
    }

    /// Recognises a comment under the cursor. Block comments absorb trailing blank space;
    /// consecutive `//` lines coalesce. Returns false when the `/` introduces neither form.
    fn comments(&mut self) -> Result<bool, LexError> {
        match self.cursor.peek() {
            b'*' => {
                if !self.block_comment() {
                    return Err(self.error(LexErrorKind::UnterminatedComment));
                }
                Ok(true)
            }
            b'/' => {
                self.line_comments();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn block_comment(&mut self) -> bool {
        match find(self.code, self.cursor.index() + 2, b"*/") {
            Some(close) => {
                while self.cursor.index() < close + 2 {
                    self.cursor.move_next();
                }
                while is_blank_space(self.cursor.value()) {
                    self.cursor.move_next();
                }
                true
            }
            None => false,
        }
    }

    fn line_comments(&mut self) {
        self.eat_line_comment();
        loop {
            // Blank space followed by another // line continues the comment block.
            let mut probe = self.cursor.index();
            while probe < self.code.len() && is_blank_space(self.code[probe]) {
                probe += 1;
            }
            if self.code.get(probe) == Some(&b'/') && self.code.get(probe + 1) == Some(&b'/') {
                while self.cursor.index() < probe {
                    self.cursor.move_next();
                }
                self.eat_line_comment();
            } else {
                return;
            }
        }
    }

    fn eat_line_comment(&mut self) {
        while !matches!(self.cursor.value(), 0 | b'\n') {
            self.cursor.move_next();
        }
    }

    /// Appends a block for `[begin, cursor)`, first materialising any gap since the previous
    /// block as [BlockKind::Other] and applying the coalescing rules.
    fn insert_block(&mut self, insert: Insert, begin: usize) {
        let end = self.cursor.index();

        let gap_start = if self.blocks.is_empty() {
            0
        } else {
            if self.merges_with_previous(insert) {
                self.blocks.last_mut().unwrap().end = end - 1;
                return;
            }
            self.blocks.last().unwrap().end + 1
        };
        if begin > gap_start {
            self.blocks.push(CodeBlock::new(BlockKind::Other, gap_start, begin - 1));
        }

        let kind = match insert {
            Insert::Block(kind) => kind,
            // Continue with nothing to extend cannot occur; None is the end-of-input flush.
            _ => return,
        };

        let block = CodeBlock::new(kind, begin, end - 1);
        if !self.merge_tail(block) {
            self.blocks.push(block);
        }
    }

    fn insert_tail(&mut self) {
        self.insert_block(Insert::None, self.cursor.index());
    }

    /// Whether the bytes ending at the cursor extend the previous block: a repeated kind, a
    /// continuation, the interior of an open parenthesis run, or the interior of an open
    /// initialisation list.
    fn merges_with_previous(&self, insert: Insert) -> bool {
        let back_kind = self.blocks.last().unwrap().kind;
        match insert {
            Insert::Continue => return true,
            Insert::Block(kind) if kind == back_kind => return true,
            _ => {}
        }
        match back_kind {
            BlockKind::ArgumentsOrParameters => self.top().parenthesis > 0,
            BlockKind::InitializationList => {
                self.top().kind == ContainerKind::InitializationList
            }
            _ => false,
        }
    }

    /// Coalesces a new block into the tail of the block vector. `{` absorbs preceding blank
    /// space; identifiers merge across `::` into one scoped identifier; the `:` of an access
    /// modifier merges with its keyword; initialisation list fragments merge.
    fn merge_tail(&mut self, block: CodeBlock) -> bool {
        if self.blocks.is_empty() {
            return false;
        }
        let target = match block.kind {
            BlockKind::BeginGroup => {
                let last = self.blocks.len() - 1;
                (self.blocks[last].kind == BlockKind::Empty).then_some(last)
            }

            BlockKind::Identifier => {
                let mut significant = self.significant_rev();
                match significant.next() {
                    Some(scope) if self.blocks[scope].kind == BlockKind::IdentifierScope => {
                        match significant.next() {
                            Some(first)
                                if self.blocks[first].kind == BlockKind::Identifier =>
                            {
                                Some(first)
                            }
                            _ => Some(scope),
                        }
                    }
                    _ => None,
                }
            }

            BlockKind::AccessModifier => match self.significant_rev().next() {
                Some(index) if self.blocks[index].kind == BlockKind::Identifier => Some(index),
                _ => None,
            },

            BlockKind::InitializationList => match self.significant_rev().next() {
                Some(index) if self.blocks[index].kind == BlockKind::InitializationList => {
                    Some(index)
                }
                _ => None,
            },

            _ => None,
        };
        match target {
            Some(index) => {
                self.blocks.truncate(index + 1);
                let back = self.blocks.last_mut().unwrap();
                back.end = block.end;
                back.kind = block.kind;
                true
            }
            None => false,
        }
    }
}

fn find(code: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > code.len() {
        return None;
    }
    code[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}

/// The byte classes of C `isspace` in the default locale.
fn is_blank_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn is_word_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric()
}
