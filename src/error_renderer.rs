//! Human-readable rendering of decode and validation errors.
//!
//! JSON syntax errors are rendered with ariadne against the source text.
//! Validation errors carry a type path instead of a source span and are
//! rendered as an indented breadcrumb.

use crate::{DecodeError, Error};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::io::Write;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The filename to display in error messages.
    /// Defaults to "<unknown>" if not provided.
    pub filename: Option<&'a str>,
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        RenderConfig::default()
    }
}

impl RenderConfig<'_> {
    const fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render a decode error to stderr using the default config.
pub fn render_error(error: &DecodeError, source: &str) {
    render_error_to(error, source, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render a decode error for `source` to a writer.
///
/// # Example
/// ```
/// use bumpalo::Bump;
/// use runtype::{RenderConfig, Runtime, TypeManager, from_json_str, render_error_to};
///
/// let arena = Bump::new();
/// let types = TypeManager::new(&arena);
/// let rt = Runtime::new(&arena);
///
/// let source = r#"{"x": 1"#;
/// let err = from_json_str(&rt, types.object(), source).unwrap_err();
///
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, source, &mut buf, &config).unwrap();
/// assert!(String::from_utf8_lossy(&buf).contains("EOF while parsing an object"));
/// ```
pub fn render_error_to(
    error: &DecodeError,
    source: &str,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    match error {
        DecodeError::Syntax(err) => render_syntax(err, source, writer, config),
        DecodeError::Type(err) => render_value_error_to(err, writer, config),
        other => {
            let segments = other.path().map(|p| p.segments()).unwrap_or_default();
            render_breadcrumb(&other.to_string(), segments, writer, config)
        }
    }
}

/// Render a validation error with its type path.
pub fn render_value_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let segments = error.path().map(|p| p.segments()).unwrap_or_default();
    render_breadcrumb(&error.to_string(), segments, writer, config)
}

fn render_breadcrumb(
    message: &str,
    segments: &[String],
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    if config.color {
        writeln!(writer, "{}: {}", "Error".fg(Color::Red), message)?;
    } else {
        writeln!(writer, "Error: {}", message)?;
    }
    let branch = match config.charset {
        CharSet::Unicode => "╰─",
        CharSet::Ascii => "`-",
    };
    for (depth, segment) in segments.iter().enumerate() {
        writeln!(writer, "{:indent$} {} {}", "", branch, segment, indent = depth * 3)?;
    }
    Ok(())
}

fn render_syntax(
    err: &serde_json::Error,
    source: &str,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let filename = config.filename.unwrap_or("<unknown>");
    let text = err.to_string();
    // serde_json appends the position, which the report header already shows.
    let message = text.split(" at line ").next().unwrap_or(&text);

    let start = char_offset(source, err.line(), err.column());
    let end = (start + 1).min(source.chars().count()).max(start);

    let ariadne_charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(ariadne_charset);

    Report::build(ReportKind::Error, (filename, start..end))
        .with_code("J001")
        .with_message(message)
        .with_config(ariadne_config)
        .with_label(
            Label::new((filename, start..end))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write((filename, Source::from(source)), &mut *writer)
}

/// Char offset of serde_json's one-based line and byte column, clamped to
/// the line.
fn char_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line.max(1) {
            let byte = column.saturating_sub(1);
            return offset + text.char_indices().take_while(|&(b, _)| b < byte).count();
        }
        offset += text.chars().count() + 1;
    }
    source.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Runtime, TypeManager, from_json_str};
    use bumpalo::Bump;
    use expect_test::{Expect, expect};

    const UNICODE_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.json"),
        charset: CharSet::Unicode,
    };

    const ASCII_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.json"),
        charset: CharSet::Ascii,
    };

    // Strip trailing whitespace ariadne leaves after markers.
    fn normalize(s: &str) -> String {
        s.lines()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            + "\n"
    }

    fn check_error(source: &str, config: &RenderConfig, expected: Expect) {
        let arena = Bump::new();
        let types = TypeManager::new(&arena);
        let rt = Runtime::new(&arena);
        let point = types
            .structure()
            .named("Point")
            .field("x", types.number())
            .field("y", types.number())
            .build()
            .unwrap()
            .ty();
        let line = types
            .structure()
            .named("Line")
            .field("a", point)
            .field("b", point)
            .build()
            .unwrap()
            .ty();

        let err = match from_json_str(&rt, line, source) {
            Err(err) => err,
            Ok(_) => panic!("Expected decode error for source: {source}"),
        };
        let mut buf = Vec::new();
        render_error_to(&err, source, &mut buf, config).unwrap();
        expected.assert_eq(&normalize(&String::from_utf8_lossy(&buf)));
    }

    #[test]
    fn test_syntax_error_unicode() {
        check_error(
            "[1, 2",
            &UNICODE_CONFIG,
            expect![[r#"
                [J001] Error: EOF while parsing a list
                   ╭─[ test.json:1:5 ]
                   │
                 1 │ [1, 2
                   │     │
                   │     ╰─ EOF while parsing a list
                ───╯
            "#]],
        );
    }

    #[test]
    fn test_syntax_error_ascii() {
        check_error(
            "[1, 2",
            &ASCII_CONFIG,
            expect![[r#"
                [J001] Error: EOF while parsing a list
                   ,-[ test.json:1:5 ]
                   |
                 1 | [1, 2
                   |     |
                   |     `- EOF while parsing a list
                ---'
            "#]],
        );
    }

    #[test]
    fn test_value_error_unicode() {
        check_error(
            r#"{"a": {"x": 1, "y": 2}, "b": {"x": "3", "y": 4}}"#,
            &UNICODE_CONFIG,
            expect![[r#"
                Error: Invalid value "3" supplied to Line/b: Point/x: Number
                 ╰─ Line
                    ╰─ b: Point
                       ╰─ x: Number
            "#]],
        );
    }

    #[test]
    fn test_shape_error_ascii() {
        check_error(
            r#"{"a": [1, 2]}"#,
            &ASCII_CONFIG,
            expect![[r#"
                Error: Invalid JSON supplied to Line/a: Point: expected an object, found array
                 `- Line
                    `- a: Point
            "#]],
        );
    }

    #[test]
    fn test_char_offset() {
        assert_eq!(char_offset("ab\ncd", 2, 2), 4);
        assert_eq!(char_offset("ab\ncd", 1, 9), 2);
        assert_eq!(char_offset("é{", 1, 3), 1);
    }

    #[test]
    fn test_render_config_default_charset() {
        let config = RenderConfig::default();
        assert_eq!(config.charset, CharSet::Unicode);
        assert!(config.color);
    }
}
