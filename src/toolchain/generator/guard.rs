use crate::toolchain::lexer::{BlockKind, CodeBlock};

/// Computes the include-guard macro identifier for a file: the chain of namespace names opened on
/// the way to the file's contents, then the file stem, then `_H`, all uppercased.
///
/// Forward-declared namespaces contribute nothing. Class, struct and enum definitions are skipped
/// to their terminating `;`, so neither their names nor anything inside them leaks into the
/// guard. Bytes that are not valid in a macro identifier become `_`.
pub fn include_guard(code: &[u8], blocks: &[CodeBlock], stem: &str) -> String {
    let mut guard = String::new();
    let mut index = 0;
    while index < blocks.len() {
        match blocks[index].kind {
            BlockKind::NamespaceKeyword => index = namespace_names(code, blocks, index, &mut guard),
            BlockKind::ClassKeyword | BlockKind::StructKeyword | BlockKind::EnumKeyword => {
                index = skip_definition(blocks, index + 1)
            }
            _ => index += 1,
        }
    }
    push_macro_text(&mut guard, stem.as_bytes());
    guard.push_str("_H");
    if guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert(0, '_');
    }
    guard
}

/// Collects the names between a `namespace` keyword and its `{`. A `;` first means a forward
/// declaration and the partial name is discarded.
fn namespace_names(
    code: &[u8],
    blocks: &[CodeBlock],
    keyword: usize,
    guard: &mut String,
) -> usize {
    let mut partial = String::new();
    let mut index = keyword + 1;
    while index < blocks.len() {
        match blocks[index].kind {
            BlockKind::Identifier => {
                push_macro_text(&mut partial, blocks[index].bytes(code));
                partial.push('_');
            }
            BlockKind::BeginGroup => {
                guard.push_str(&partial);
                return index + 1;
            }
            BlockKind::StatementTerminator => return index + 1,
            _ => {}
        }
        index += 1;
    }
    index
}

/// Skips past a class/struct/enum: to the `;` terminating its definition or forward declaration.
fn skip_definition(blocks: &[CodeBlock], mut index: usize) -> usize {
    let mut depth: usize = 0;
    while index < blocks.len() {
        match blocks[index].kind {
            BlockKind::BeginGroup => depth += 1,
            BlockKind::EndGroup => depth = depth.saturating_sub(1),
            BlockKind::StatementTerminator if depth == 0 => return index + 1,
            _ => {}
        }
        index += 1;
    }
    index
}

fn push_macro_text(out: &mut String, text: &[u8]) {
    for &byte in text {
        if byte.is_ascii_alphanumeric() {
            out.push(byte.to_ascii_uppercase() as char);
        } else {
            out.push('_');
        }
    }
}
