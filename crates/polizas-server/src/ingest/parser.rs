//! CSV text to table parser with arity reconciliation

use tracing::{debug, warn};

use super::tokenizer::tokenize_line;
use super::IngestError;

/// A parsed CSV table: header names in column order plus the data rows.
///
/// Invariant: every row has exactly `headers.len()` entries after
/// reconciliation. Entries are `None` where padding supplied a missing
/// trailing field.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Parse full CSV text into headers and reconciled rows.
///
/// Blank lines are discarded. Fails only when fewer than two non-blank
/// lines remain (no data rows).
pub fn parse_table(text: &str) -> Result<ParsedTable, IngestError> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(IngestError::EmptyInput);
    }

    let headers = tokenize_line(lines[0]);
    debug!(count = headers.len(), "Parsed CSV headers");

    let rows = lines[1..]
        .iter()
        .enumerate()
        .map(|(index, line)| reconcile_arity(tokenize_line(line), headers.len(), index + 2))
        .collect();

    Ok(ParsedTable { headers, rows })
}

/// Make a row's field count match the header count: pad with nulls on the
/// right when short, truncate from the right when long. Assumes the first
/// columns are authoritative; never realigns and never fails.
fn reconcile_arity(
    fields: Vec<String>,
    header_count: usize,
    line_number: usize,
) -> Vec<Option<String>> {
    if fields.len() != header_count {
        warn!(
            line_number,
            found = fields.len(),
            expected = header_count,
            "Row arity mismatch; padding or truncating"
        );
    }

    let mut row: Vec<Option<String>> = fields.into_iter().map(Some).collect();
    row.truncate(header_count);
    row.resize(header_count, None);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_parse_simple_table() {
        let table = parse_table("A,B\n1,2\n3,4").unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(
            table.rows,
            vec![vec![cell("1"), cell("2")], vec![cell("3"), cell("4")]]
        );
    }

    #[test]
    fn test_blank_lines_discarded() {
        let table = parse_table("A,B\n\n1,2\n   \n3,4\n").unwrap();
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_header_only_is_empty_input() {
        assert!(matches!(parse_table("A,B\n"), Err(IngestError::EmptyInput)));
    }

    #[test]
    fn test_empty_text_is_empty_input() {
        assert!(matches!(parse_table(""), Err(IngestError::EmptyInput)));
    }

    #[test]
    fn test_short_row_padded_with_nulls() {
        let table = parse_table("A,B,C\n1,2").unwrap();
        assert_eq!(table.rows[0], vec![cell("1"), cell("2"), None]);
    }

    #[test]
    fn test_long_row_truncated() {
        let table = parse_table("A,B\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0], vec![cell("1"), cell("2")]);
    }

    #[test]
    fn test_every_row_matches_header_count() {
        let table = parse_table("A,B,C\n1\n1,2\n1,2,3\n1,2,3,4\n1,2,3,4,5").unwrap();
        for row in &table.rows {
            assert_eq!(row.len(), table.headers.len());
        }
    }
}
