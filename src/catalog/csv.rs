//! CSV reading for library exports.
//!
//! Quoted fields may contain the delimiter, doubled quotes and line breaks
//! (game summaries routinely span several lines), so records are split on the
//! whole file rather than line by line.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Split `content` into records of fields.
pub fn parse_records(content: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 0;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quotes && current.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                push_record(&mut records, std::mem::take(&mut fields));
                line += 1;
            }
            _ => {
                if c == '\n' {
                    line += 1;
                }
                current.push(c);
            }
        }
    }

    if in_quotes {
        return Err(Error::Csv { line: quote_line, message: "unterminated quoted field".into() });
    }
    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        push_record(&mut records, fields);
    }
    Ok(records)
}

/// Blank lines produce no record.
fn push_record(records: &mut Vec<Vec<String>>, fields: Vec<String>) {
    if fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    records.push(fields);
}

/// Parse with the first record as header; each row maps column name to value.
/// Short rows are padded with empty values, surplus fields are dropped.
pub fn read_rows(content: &str, delimiter: char) -> Result<Vec<HashMap<String, String>>> {
    let mut records = parse_records(content, delimiter)?.into_iter();
    let Some(headers) = records.next() else {
        return Ok(Vec::new());
    };
    Ok(records
        .map(|fields| {
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), fields.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_records() {
        let records = parse_records("a,b,c\n1,2,3\n", ',').unwrap();
        assert_eq!(records, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_quoted_delimiter_and_escaped_quote() {
        let records = parse_records("\"x, y\",\"say \"\"hi\"\"\"\n", ',').unwrap();
        assert_eq!(records, vec![vec!["x, y", "say \"hi\""]]);
    }

    #[test]
    fn test_multiline_field_and_crlf() {
        let records = parse_records("t,s\r\n\"one\",\"line 1\r\nline 2\"\r\n", ',').unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][1], "line 1\r\nline 2");
    }

    #[test]
    fn test_custom_delimiter_and_no_trailing_newline() {
        let records = parse_records("a;b\n1;2", ';').unwrap();
        assert_eq!(records[1], vec!["1", "2"]);
    }

    #[test]
    fn test_unterminated_quote_reports_line() {
        let err = parse_records("a,b\n1,\"open\n", ',').unwrap_err();
        assert!(matches!(err, Error::Csv { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_rows_are_keyed_by_header() {
        let rows = read_rows("\u{feff}title,score\nDoom,90\nQuake\n\n", ',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["title"], "Doom");
        assert_eq!(rows[0]["score"], "90");
        assert_eq!(rows[1]["score"], "");
    }
}
