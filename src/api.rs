use crate::document::AreaDocument;
use crate::error::AreaError;
use crate::parser::Parser;

/// Parses one area file's text into an [`AreaDocument`].
///
/// This is the single entry point wrapped by the CLI. It builds a fresh
/// parser per call; no state is shared between invocations, so different
/// files may be parsed concurrently.
///
/// # Arguments
///
/// * `source` - The area file contents.
/// * `file_name` - The name of the file being parsed (used for error
///   reporting).
///
/// # Errors
///
/// Returns an `AreaError` locating the first malformed token, missing
/// sentinel, or unknown section tag; no partial document is produced.
pub fn parse(source: &str, file_name: &str) -> Result<AreaDocument, AreaError> {
    let mut parser = Parser::new_with_name(source, file_name.to_string());
    parser.parse_document()
}
