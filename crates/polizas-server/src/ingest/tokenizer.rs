//! Quote-aware CSV line tokenizer
//!
//! A `"` toggles the in-quotes flag and is never emitted; a `,` outside
//! quotes ends the field. This is not RFC 4180: doubled quotes are not
//! unescaped and quoted fields cannot span lines. It matches what the
//! legacy importer accepted, which is the contract the uploaded files
//! were authored against.

use tracing::warn;

/// Split one line into trimmed field strings.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            },
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    if in_quotes {
        // Field boundaries after the stray quote have shifted; the row is
        // still ingested.
        warn!(line, "Unbalanced quote in CSV line");
    }

    fields.into_iter().map(strip_surrounding_quotes).collect()
}

/// Strip one pair of quotes wrapping the entire field.
fn strip_surrounding_quotes(field: String) -> String {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        field[1..field.len() - 1].to_string()
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(tokenize_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        assert_eq!(tokenize_line(" a , b ,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_comma_inside_quotes_is_literal() {
        assert_eq!(tokenize_line("\"a,b\",c"), vec!["a,b", "c"]);
    }

    #[test]
    fn test_empty_fields_preserved() {
        assert_eq!(tokenize_line("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn test_trailing_comma_yields_empty_last_field() {
        assert_eq!(tokenize_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_unbalanced_quote_swallows_commas() {
        // The stray quote leaves the flag toggled for the rest of the line.
        assert_eq!(tokenize_line("a,\"b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_strip_surrounding_quotes() {
        assert_eq!(strip_surrounding_quotes("\"x\"".to_string()), "x");
        assert_eq!(strip_surrounding_quotes("x".to_string()), "x");
        assert_eq!(strip_surrounding_quotes("\"".to_string()), "\"");
    }
}
