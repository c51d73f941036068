use ariadne::{Label, Report, ReportKind, Source};
use std::collections::HashSet;
use std::io;
use std::ops::Range;

pub type XppResult<T> = Result<T, XppError>;

/// Errors raised while scanning, parsing or evaluating a conditional expression.
///
/// Spans are character offsets into the expression text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XppError {
    #[error("{message} (offset {})", .span.start)]
    Lex { message: String, span: Range<usize> },

    #[error("{message} (offset {})", .span.start)]
    Parse { message: String, span: Range<usize> },

    #[error("{message} (offset {})", .span.start)]
    Eval { message: String, span: Range<usize> },

    #[error("configuration error: {0}")]
    Config(String),
}

impl XppError {
    pub fn lex(message: impl Into<String>, span: Range<usize>) -> Self {
        XppError::Lex { message: message.into(), span }
    }

    pub fn parse(message: impl Into<String>, span: Range<usize>) -> Self {
        XppError::Parse { message: message.into(), span }
    }

    pub fn eval(message: impl Into<String>, span: Range<usize>) -> Self {
        XppError::Eval { message: message.into(), span }
    }

    pub fn config(message: impl Into<String>) -> Self {
        XppError::Config(message.into())
    }

    /// Location in the expression text, if the error has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            XppError::Lex { span, .. } | XppError::Parse { span, .. } | XppError::Eval { span, .. } => {
                Some(span.clone())
            }
            XppError::Config(_) => None,
        }
    }

    fn message(&self) -> String {
        match self {
            XppError::Lex { message, .. } | XppError::Parse { message, .. } | XppError::Eval { message, .. } => {
                message.clone()
            }
            XppError::Config(message) => message.clone(),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            XppError::Lex { .. } => "Lexical error",
            XppError::Parse { .. } => "Parsing error",
            XppError::Eval { .. } => "Evaluation error",
            XppError::Config(_) => "Configuration error",
        }
    }
}

/// Prints a report for every located error to stderr. Errors without a location are printed
/// as plain lines.
pub fn print_errors(source: &str, errors: &[XppError]) -> io::Result<()> {
    let source_name = "expression";
    let mut error_reported = HashSet::<(usize, usize)>::new();

    for error in errors.iter() {
        let Some(span) = error.span() else {
            eprintln!("{}", error);
            continue;
        };

        // report only one error per span to declutter output
        if !error_reported.insert((span.start, span.end)) {
            continue;
        }

        // ariadne needs a non-empty range inside the source, EOF errors sit past the end
        let length = source.chars().count();
        if length == 0 {
            eprintln!("{}", error);
            continue;
        }
        let start = span.start.min(length - 1);
        let span = start..span.end.clamp(start + 1, length);
        Report::build(ReportKind::Error, (source_name, span.clone()))
            .with_message(error.title())
            .with_label(Label::new((source_name, span)).with_message(error.message()))
            .finish()
            .eprint((source_name, Source::from(source)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset() {
        let error = XppError::lex("Unexpected character '#'", 4..5);
        assert_eq!(error.to_string(), "Unexpected character '#' (offset 4)");
    }

    #[test]
    fn test_config_errors_have_no_span() {
        let error = XppError::config("duplicate value 'x'");
        assert_eq!(error.span(), None);
        assert_eq!(error.to_string(), "configuration error: duplicate value 'x'");
    }

    #[test]
    fn test_print_errors_accepts_spans_past_end() {
        let errors = vec![
            XppError::parse("Reached EOF in invalid state", 6..6),
            XppError::parse("Reached EOF in invalid state", 6..6),
            XppError::config("no such file"),
        ];
        assert!(print_errors("TRUE (", &errors).is_ok());
    }
}
