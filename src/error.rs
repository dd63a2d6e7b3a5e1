use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum AreaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Unterminated string")]
    #[diagnostic(
        code(parser::unterminated_string),
        help("Every free-text field must be closed with a '~' before the end of the file.")
    )]
    UnterminatedString {
        #[source_code]
        src: NamedSource<String>,
        #[label("This field starts here and never reaches a '~'")]
        span: SourceSpan,
    },

    #[error("Unexpected block marker")]
    #[diagnostic(
        code(parser::unexpected_block_marker),
        help("The set of sub-block markers is closed per record type; only the listed markers may appear before the terminator.")
    )]
    UnexpectedBlockMarker {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Unknown section tag '#{tag}'")]
    #[diagnostic(
        code(parser::unknown_section_tag),
        help("Recognized sections are #AREA, #ROOMS, #OBJECTS, #OBJOLD, #MOBILES, #MOBOLD, #RESETS, #SHOPS, #OLIMITS, #PRACTICERS, #SPECIALS, #OMPROGS, #HELPS, #RESETMESSAGE, #FLAG, and the #$ terminator.")
    )]
    UnknownSectionTag {
        #[source_code]
        src: NamedSource<String>,
        #[label("This tag is not a recognized section")]
        span: SourceSpan,
        tag: String,
    },

    #[error("Malformed token")]
    #[diagnostic(
        code(parser::malformed_numeric_token),
        help("The field at this position expects a signed decimal integer or a flag word.")
    )]
    MalformedNumericToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected} here")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Missing terminator in {section}")]
    #[diagnostic(
        code(parser::missing_terminator),
        help("Every repeated section must be closed by its own sentinel; the input ran out before it appeared.")
    )]
    MissingTerminator {
        #[source_code]
        src: NamedSource<String>,
        #[label("The {section} section was still open; expected '{terminator}'")]
        span: SourceSpan,
        section: String,
        terminator: String,
    },
}
