//! Minimal CSV reader and writer for schedule files.
//!
//! Follows RFC 4180 quoting: a field is quoted when it contains a comma, a
//! quote or a line break, and embedded quotes are doubled. Quoted fields may
//! span lines. Both LF and CRLF line endings are accepted.

use std::borrow::Cow;

use crate::error::ParseError;

/// One parsed record and the line it started on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV text into records. Blank lines are skipped.
pub fn parse(text: &str) -> Result<Vec<CsvRecord>, ParseError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => {
                in_quotes = true;
                quoted = true;
            }
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                fields.push(std::mem::take(&mut field));
                finish_record(&mut records, &mut fields, record_line, quoted);
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote(record_line));
    }
    if !field.is_empty() || !fields.is_empty() || quoted {
        fields.push(field);
        finish_record(&mut records, &mut fields, record_line, quoted);
    }
    Ok(records)
}

fn finish_record(records: &mut Vec<CsvRecord>, fields: &mut Vec<String>, line: usize, quoted: bool) {
    let blank = !quoted && fields.len() == 1 && fields[0].trim().is_empty();
    let fields = std::mem::take(fields);
    if !blank {
        records.push(CsvRecord { line, fields });
    }
}

/// Quote a field if it needs it.
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

/// Append one CSV line (with trailing newline) to `out`.
pub fn write_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, f) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(f.as_ref()));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(records: &[CsvRecord]) -> Vec<Vec<&str>> {
        records
            .iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn parses_plain_and_quoted_fields() {
        let recs = parse("a,b,c\n\"x, y\",\"say \"\"hi\"\"\",\n").unwrap();
        assert_eq!(fields(&recs), vec![vec!["a", "b", "c"], vec!["x, y", "say \"hi\"", ""]]);
    }

    #[test]
    fn quoted_fields_span_lines_and_keep_line_numbers() {
        let recs = parse("h1,h2\r\n\"multi\nline\",2\r\n\r\nlast,3").unwrap();
        assert_eq!(fields(&recs), vec![vec!["h1", "h2"], vec!["multi\nline", "2"], vec!["last", "3"]]);
        assert_eq!(recs.iter().map(|r| r.line).collect::<Vec<_>>(), vec![1, 2, 5]);
    }

    #[test]
    fn blank_lines_are_skipped_but_empty_quoted_fields_are_not() {
        let recs = parse("a\n\n   \n\"\"\n").unwrap();
        assert_eq!(fields(&recs), vec![vec!["a"], vec![""]]);
    }

    #[test]
    fn unterminated_quote_is_a_parse_error() {
        assert_eq!(parse("a,b\n\"open,1\n").unwrap_err(), ParseError::UnterminatedQuote(2));
    }

    #[test]
    fn writer_output_parses_back() {
        let mut out = String::new();
        write_row(&mut out, &["Road, phase 1", "Crew \"A\"", "plain"]);
        assert_eq!(out, "\"Road, phase 1\",\"Crew \"\"A\"\"\",plain\n");
        assert_eq!(fields(&parse(&out).unwrap()), vec![vec!["Road, phase 1", "Crew \"A\"", "plain"]]);
    }
}
