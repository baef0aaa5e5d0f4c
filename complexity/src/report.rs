//! Plain-text rendering of an aggregate.
//!
//! ```text
//! [<txID>]\t<complexity>     one line per non-zero transaction
//!                            blank line
//! Block Complexity: <total>
//! ```
//!
//! Zero-complexity transactions are left out of the lines but still count
//! toward the total.

use std::io::{self, Write};

use crate::complexity::{AggregateResult, ComplexityRecord};

/// Format one per-transaction report line.
pub fn format_line(record: &ComplexityRecord) -> String {
    format!("[{}]\t{}", record.id, record.spent_complexity)
}

/// Report lines for the non-zero records, in block order.
pub fn transaction_lines(result: &AggregateResult) -> Vec<String> {
    result.non_zero().map(format_line).collect()
}

pub fn total_line(result: &AggregateResult) -> String {
    format!("Block Complexity: {}", result.total())
}

/// Write the full report to `out`.
pub fn write_report<W: Write>(out: &mut W, result: &AggregateResult) -> io::Result<()> {
    for line in transaction_lines(result) {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", total_line(result))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Digest;

    fn fixture() -> AggregateResult {
        AggregateResult::new(
            [0u64, 3, 0, 12, 7]
                .iter()
                .enumerate()
                .map(|(i, c)| ComplexityRecord::new(Digest::new([i as u8 + 1; 32]), *c))
                .collect(),
        )
    }

    #[test]
    fn test_only_non_zero_lines_are_reported() {
        let result = fixture();
        let lines = transaction_lines(&result);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("\t3"));
        assert!(lines[1].ends_with("\t12"));
        assert!(lines[2].ends_with("\t7"));
    }

    #[test]
    fn test_line_format() {
        let id = Digest::new([2u8; 32]);
        let line = format_line(&ComplexityRecord::new(id, 12));
        assert_eq!(line, format!("[{}]\t12", id.to_base58()));
    }

    #[test]
    fn test_full_report_layout() {
        let result = fixture();
        let mut out = Vec::new();
        write_report(&mut out, &result).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('['));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Block Complexity: 22");
    }

    #[test]
    fn test_empty_block_report() {
        let mut out = Vec::new();
        write_report(&mut out, &AggregateResult::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nBlock Complexity: 0\n");
    }
}
