pub mod source_buffer;

pub use source_buffer::SourceBuffer;

/// Builds an in-memory [SourceBuffer] from a string literal, named after the call site.
#[macro_export]
macro_rules! cppx {
    ( $s:literal ) => {
        &$crate::toolchain::source::SourceBuffer::new_from_str(
            $s,
            const_format::formatcp!("{}:{}:{}", file!(), line!(), column!()),
        )
    };
}
