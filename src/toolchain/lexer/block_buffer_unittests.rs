#[cfg(test)]
mod tests {
    use crate::cppx;
    use crate::toolchain::diagnostics::{LexError, LexErrorKind};
    use crate::toolchain::lexer::BlockBuffer;
    use crate::toolchain::source::SourceBuffer;

    /// Lexing helper comparing the blocks to a debug dump, one `Kind "text"` line per block.
    ///
    /// Note that the debug printer escapes `"` and `\` characters inside the block text, so a
    /// char literal `'\n'` (four bytes) prints as `"'\\n'"`.
    fn check_blocks(source: &SourceBuffer, expect: &str) {
        let buffer = BlockBuffer::lex(source.code()).unwrap();
        let actual: String = buffer
            .blocks()
            .iter()
            .map(|block| format!("\n{:?} {:?}", block.kind, block.text(buffer.code())))
            .collect();
        assert_eq!(expect, &actual);
    }

    fn check_error(source: &SourceBuffer, kind: LexErrorKind, line: u32, excerpt: &str) {
        let error = BlockBuffer::lex(source.code()).unwrap_err();
        assert_eq!(error, LexError { kind, line, excerpt: String::from(excerpt) });
    }

    #[test]
    fn smoke_test() {
        check_blocks(
            cppx!("namespace n { class C { public: C(); void f(); }; }"),
            r#"
NamespaceKeyword "namespace"
Empty " "
Identifier "n"
BeginGroup " {"
Empty " "
ClassKeyword "class"
Empty " "
Identifier "C"
BeginGroup " {"
Empty " "
AccessModifier "public:"
Empty " "
ConstructorDestructor "C"
ArgumentsOrParameters "()"
StatementTerminator ";"
Empty " "
Identifier "void"
Empty " "
FunctionName "f"
ArgumentsOrParameters "()"
StatementTerminator ";"
Empty " "
EndGroup "}"
StatementTerminator ";"
Empty " "
EndGroup "}""#,
        );
    }

    #[test]
    fn scoped_identifiers_merge() {
        check_blocks(
            cppx!("std::vector v;"),
            r#"
Identifier "std::vector"
Empty " "
Identifier "v"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn destructor_identifier_promoted_tilde_stays_in_gap() {
        check_blocks(
            cppx!("class K { ~K() { } };"),
            r#"
ClassKeyword "class"
Empty " "
Identifier "K"
BeginGroup " {"
Empty " "
Other "~"
ConstructorDestructor "K"
ArgumentsOrParameters "()"
BeginGroup " {"
Empty " "
EndGroup "}"
Empty " "
EndGroup "}"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn initialization_list_coalesces() {
        check_blocks(
            cppx!("struct P { P() : x(0), y(1) {} };"),
            r#"
StructKeyword "struct"
Empty " "
Identifier "P"
BeginGroup " {"
Empty " "
ConstructorDestructor "P"
ArgumentsOrParameters "()"
Empty " "
InitializationList ": x(0), y(1)"
BeginGroup " {"
EndGroup "}"
Empty " "
EndGroup "}"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn enum_definition() {
        check_blocks(
            cppx!("enum E { A };"),
            r#"
EnumKeyword "enum"
Empty " "
Identifier "E"
BeginGroup " {"
Empty " "
Identifier "A"
Empty " "
EndGroup "}"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn block_comment_absorbs_trailing_blank_space() {
        check_blocks(
            cppx!("int x; /* a */\nint y;"),
            r#"
Identifier "int"
Empty " "
Identifier "x"
StatementTerminator ";"
Empty " "
Comment "/* a */\n"
Identifier "int"
Empty " "
Identifier "y"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn line_comments_coalesce() {
        check_blocks(
            cppx!("// one\n  // two\nint x;"),
            r#"
Comment "// one\n  // two"
Empty "\n"
Identifier "int"
Empty " "
Identifier "x"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn directives() {
        // A directive runs to the end of the line, newline included; adjacent directives
        // coalesce. A block comment that closes on the directive line is absorbed; one that does
        // not ends the directive early and lexes separately.
        check_blocks(
            cppx!("#include <vector>\n#define A 1 /* one */\n#define B /* two\n*/\nint x;"),
            r##"
Directive "#include <vector>\n#define A 1 /* one */"
Empty "\n"
Directive "#define B "
Comment "/* two\n*/\n"
Identifier "int"
Empty " "
Identifier "x"
StatementTerminator ";""##,
        );
    }

    #[test]
    fn literals() {
        check_blocks(
            cppx!("char c = '\\n'; const char * s = \"a\\tb\";"),
            r#"
Identifier "char"
Empty " "
Identifier "c"
Empty " = "
CharLiteral "'\\n'"
StatementTerminator ";"
Empty " "
Identifier "const"
Empty " "
Identifier "char"
Empty " * "
Identifier "s"
Empty " = "
StringLiteral "\"a\\tb\""
StatementTerminator ";""#,
        );
    }

    #[test]
    fn numeric_escapes() {
        check_blocks(
            cppx!(r"char a = '\101'; char b = '\x41';"),
            r#"
Identifier "char"
Empty " "
Identifier "a"
Empty " = "
CharLiteral "'\\101'"
StatementTerminator ";"
Empty " "
Identifier "char"
Empty " "
Identifier "b"
Empty " = "
CharLiteral "'\\x41'"
StatementTerminator ";""#,
        );
    }

    #[test]
    fn raw_strings() {
        check_blocks(
            cppx!(r#"R"x(a)x""#),
            r#"
Identifier "R"
StringLiteral "\"x(a)x\"""#,
        );
    }

    #[test]
    fn unterminated_comment() {
        check_error(cppx!("/* does not end"), LexErrorKind::UnterminatedComment, 1, "/* does not end");
        check_error(cppx!("int x;\n/* oops\nmore"), LexErrorKind::UnterminatedComment, 2, "/* oops");
    }

    #[test]
    fn unterminated_string() {
        check_error(cppx!("\"abc"), LexErrorKind::UnterminatedString, 1, "\"abc");
        // A bare newline ends the search for the closing quote.
        check_error(cppx!("\"abc\ndef\""), LexErrorKind::UnterminatedString, 1, "\"abc");
    }

    #[test]
    fn char_literal_errors() {
        check_error(cppx!("''"), LexErrorKind::EmptyCharLiteral, 1, "'");
        check_error(cppx!("'ab'"), LexErrorKind::UnterminatedCharLiteral, 1, "b'");
        check_error(cppx!(r"'\q'"), LexErrorKind::InvalidEscapeSequence, 1, "q'");
    }

    #[test]
    fn raw_string_errors() {
        // Blank space is not allowed in the delimiter.
        check_error(cppx!(r#"R"de l(x)de l""#), LexErrorKind::InvalidRawString, 1, "\"de l(x)de l\"");
        // The quoted content never crosses a line break.
        check_error(cppx!("R\"(a\nb)\""), LexErrorKind::InvalidRawString, 1, "\"(a");
    }

    #[test]
    fn unbalanced_groups() {
        check_error(cppx!("}"), LexErrorKind::UnbalancedBrace, 1, "}");
        check_error(cppx!("int f() { } )"), LexErrorKind::UnbalancedParen, 1, ")");
    }

    #[test]
    fn blocks_cover_input() {
        let source = cppx!("namespace g {\nclass Point {\npublic:\n    Point() : x_{0}, y_{0} {}\n    int x() { return x_; }\nprivate:\n    int x_, y_;\n};\n}\n");
        let buffer = BlockBuffer::lex(source.code()).unwrap();
        let mut joined: Vec<u8> = Vec::new();
        let mut next = 0;
        for block in buffer.blocks() {
            assert_eq!(block.begin, next);
            assert!(block.end >= block.begin);
            next = block.end + 1;
            joined.extend_from_slice(block.bytes(buffer.code()));
        }
        assert_eq!(next, buffer.code().len());
        assert_eq!(joined.as_slice(), buffer.code());
    }

    #[test]
    fn empty_input() {
        let source = cppx!("");
        let buffer = BlockBuffer::lex(source.code()).unwrap();
        assert!(buffer.blocks().is_empty());
    }

    #[test]
    fn unclassified_input_becomes_other() {
        check_blocks(
            cppx!("~!@"),
            r#"
Other "~!@""#,
        );
    }
}
