use std::io::{self, Write};

use crate::toolchain::lexer::{BlockKind, CodeBlock};

/// One frame of the splitter's container stack.
struct Frame {
    braces: usize,
    /// Qualifying name, empty for anonymous containers and the sentinel frame.
    name: Vec<u8>,
}

impl Frame {
    fn sentinel() -> Frame {
        Frame { braces: 0, name: Vec::new() }
    }
}

/// Walks the block sequence and routes every byte to the interface stream, the implementation
/// stream, or both.
///
/// Runs of blocks whose destination is not yet known (blank space, identifiers in the middle of a
/// declaration) collect in a pending buffer that the next structural block resolves. Function
/// bodies found at their declaration site move to the implementation, prefixed with the qualified
/// scope assembled from the enclosing container names; the interface keeps the signature followed
/// by `;`.
pub fn generate<H: Write, S: Write>(
    code: &[u8],
    blocks: &[CodeBlock],
    stem: &str,
    guard: &str,
    interface: &mut H,
    implementation: &mut S,
) -> io::Result<()> {
    let mut splitter = Splitter {
        code,
        blocks,
        interface,
        implementation,
        pending: Vec::new(),
        frames: vec![Frame::sentinel()],
    };
    splitter.run(stem, guard)
}

struct Splitter<'s, 'w, H: Write, S: Write> {
    code: &'s [u8],
    blocks: &'s [CodeBlock],
    interface: &'w mut H,
    implementation: &'w mut S,
    pending: Vec<u8>,
    frames: Vec<Frame>,
}

impl<'s, 'w, H: Write, S: Write> Splitter<'s, 'w, H, S> {
    fn run(&mut self, stem: &str, guard: &str) -> io::Result<()> {
        let mut index = 0;

        // A leading comment (typically a license header) goes to both outputs.
        if let Some(first) = self.blocks.first() {
            if first.kind == BlockKind::Comment {
                let bytes = first.bytes(self.code);
                self.interface.write_all(bytes)?;
                self.implementation.write_all(bytes)?;
                index = 1;
            }
        }
        write!(self.interface, "#ifndef {}\n#define {}\n\n", guard, guard)?;
        write!(self.implementation, "#include \"{}.h\"\n", stem)?;

        while index < self.blocks.len() {
            index = self.dispatch(index)?;
        }

        self.flush_interface()?;
        write!(self.interface, "\n\n#endif // {}\n", guard)
    }

    fn dispatch(&mut self, index: usize) -> io::Result<usize> {
        let block = self.blocks[index];
        match block.kind {
            BlockKind::Directive
            | BlockKind::AccessModifier
            | BlockKind::StatementTerminator => {
                self.flush_interface()?;
                self.interface.write_all(block.bytes(self.code))?;
                Ok(index + 1)
            }

            BlockKind::NamespaceKeyword
            | BlockKind::ClassKeyword
            | BlockKind::StructKeyword
            | BlockKind::EnumKeyword => self.container_header(index),

            BlockKind::FunctionName | BlockKind::ConstructorDestructor => self.function(index),

            BlockKind::BeginGroup => {
                self.flush_interface()?;
                self.interface.write_all(block.bytes(self.code))?;
                self.frames.last_mut().unwrap().braces += 1;
                Ok(index + 1)
            }

            BlockKind::EndGroup => {
                self.flush_interface()?;
                self.interface.write_all(block.bytes(self.code))?;
                let top = self.frames.last_mut().unwrap();
                if top.braces > 0 {
                    top.braces -= 1;
                }
                let closed = top.braces == 0;
                if closed && self.frames.len() > 1 {
                    self.frames.pop();
                }
                Ok(index + 1)
            }

            // A neutral run; the next structural block decides where it lands.
            _ => {
                self.pending.extend_from_slice(block.bytes(self.code));
                Ok(index + 1)
            }
        }
    }

    /// Buffers a `namespace`/`class`/`struct`/`enum` header up to its `{` (definition, opening a
    /// container) or `;` (forward declaration). Either way the header belongs to the interface.
    fn container_header(&mut self, start: usize) -> io::Result<usize> {
        let mut name: Vec<u8> = Vec::new();
        let mut index = start;
        while index < self.blocks.len() {
            let block = self.blocks[index];
            self.pending.extend_from_slice(block.bytes(self.code));
            match block.kind {
                BlockKind::Identifier if name.is_empty() => {
                    name = block.bytes(self.code).to_vec();
                }
                BlockKind::BeginGroup => {
                    self.flush_interface()?;
                    self.frames.push(Frame { braces: 1, name });
                    return Ok(index + 1);
                }
                BlockKind::StatementTerminator => {
                    self.flush_interface()?;
                    return Ok(index + 1);
                }
                _ => {}
            }
            index += 1;
        }
        self.flush_interface()?;
        Ok(index)
    }

    /// Accumulates a function signature from its name block up to `;` (a declaration, kept in the
    /// interface) or `{`/initialisation list (a definition, relocated to the implementation).
    fn function(&mut self, start: usize) -> io::Result<usize> {
        let mut signature: Vec<u8> = Vec::new();

        // A destructor's `~` sits in the gap in front of the promoted identifier; claim it back
        // from the pending buffer so it qualifies as `K::~K`, not `~K::K`.
        if self.blocks[start].kind == BlockKind::ConstructorDestructor
            && self.pending.last() == Some(&b'~')
        {
            self.pending.pop();
            signature.push(b'~');
        }

        let mut index = start;
        while index < self.blocks.len() {
            let block = self.blocks[index];
            match block.kind {
                BlockKind::StatementTerminator => {
                    self.flush_interface()?;
                    self.interface.write_all(&signature)?;
                    self.interface.write_all(block.bytes(self.code))?;
                    return Ok(index + 1);
                }
                BlockKind::BeginGroup | BlockKind::InitializationList => {
                    return self.function_definition(index, &signature);
                }
                _ => {
                    signature.extend_from_slice(block.bytes(self.code));
                    index += 1;
                }
            }
        }
        self.flush_interface()?;
        self.interface.write_all(&signature)?;
        Ok(index)
    }

    /// Relocates a definition: the interface receives the signature plus `;`, the implementation
    /// the qualified signature and the whole body.
    fn function_definition(&mut self, start: usize, signature: &[u8]) -> io::Result<usize> {
        self.flush_both()?;

        for frame_index in 0..self.frames.len() {
            if !self.frames[frame_index].name.is_empty() {
                self.implementation.write_all(&self.frames[frame_index].name)?;
                self.implementation.write_all(b"::")?;
            }
        }
        self.implementation.write_all(signature)?;
        self.interface.write_all(signature)?;
        self.interface.write_all(b";")?;

        let trigger = self.blocks[start];
        self.implementation.write_all(trigger.bytes(self.code))?;
        let braces = if trigger.kind == BlockKind::BeginGroup { 1 } else { 0 };
        self.frames.push(Frame { braces, name: Vec::new() });

        let mut index = start + 1;
        while index < self.blocks.len() {
            let block = self.blocks[index];
            self.implementation.write_all(block.bytes(self.code))?;
            index += 1;
            let top = self.frames.last_mut().unwrap();
            match block.kind {
                BlockKind::BeginGroup => top.braces += 1,
                BlockKind::EndGroup => {
                    if top.braces > 0 {
                        top.braces -= 1;
                    }
                    if top.braces == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        self.frames.pop();
        Ok(index)
    }

    fn flush_interface(&mut self) -> io::Result<()> {
        self.interface.write_all(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    fn flush_both(&mut self) -> io::Result<()> {
        self.interface.write_all(&self.pending)?;
        self.implementation.write_all(&self.pending)?;
        self.pending.clear();
        Ok(())
    }
}
