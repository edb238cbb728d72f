//! Output formatting module
//!
//! This module handles formatting normalized trace rows for different output formats.

use crate::Result;
use crate::trace::EdgeRow;
use crate::units::format_coins;
use serde_json::json;

/// Output rows as JSON
pub fn output_json(w: &mut impl std::io::Write, rows: &[EdgeRow]) -> Result<()> {
    let origins = rows.iter().filter(|row| row.is_origin()).count();
    let output = json!({
        "summary": {
            "total_transactions": rows.len(),
            "origin_transactions": origins,
        },
        "rows": serde_json::to_value(rows)?,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output rows as text table
pub fn output_table(w: &mut impl std::io::Write, rows: &[EdgeRow]) -> Result<()> {
    writeln!(w, "TON Trace Visualization - Normalized Transactions")?;
    writeln!(w, "{}", "=".repeat(100))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Total Transactions: {}", rows.len())?;
    writeln!(
        w,
        "  Origin Transactions: {}",
        rows.iter().filter(|row| row.is_origin()).count()
    )?;
    writeln!(w)?;

    if rows.is_empty() {
        return Ok(());
    }

    writeln!(w, "{:-<100}", "")?;
    writeln!(
        w,
        "{:>4} {:<16} {:<16} {:>18} {:>12} {:>6} {:>6} {:<10}",
        "#", "From", "To", "Value", "Op", "Exit", "Action", "Flags"
    )?;
    writeln!(w, "{:-<100}", "")?;

    for (idx, row) in rows.iter().enumerate() {
        let from = row
            .from
            .map(|sender| shorten(&sender.to_string()))
            .unwrap_or_else(|| "-".to_string());
        let value = row.value.map(format_coins).unwrap_or_else(|| "-".to_string());
        let op = row
            .op
            .map(|op| format!("0x{:08x}", op))
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            w,
            "{:>4} {:<16} {:<16} {:>18} {:>12} {:>6} {:>6} {:<10}",
            idx,
            from,
            shorten(&row.to.to_string()),
            value,
            op,
            optional(row.exit_code),
            optional(row.action_result_code),
            flags(row)
        )?;
    }
    writeln!(w)?;

    Ok(())
}

fn shorten(s: &str) -> String {
    if s.len() > 14 {
        format!("{}...", &s[..11])
    } else {
        s.to_string()
    }
}

fn optional(code: Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

/// One letter per raised lifecycle flag
fn flags(row: &EdgeRow) -> String {
    let mut s = String::new();
    if row.deploy {
        s.push('D');
    }
    if row.aborted == Some(true) {
        s.push('A');
    }
    if row.destroyed == Some(true) {
        s.push('X');
    }
    if row.bounced == Some(true) {
        s.push('B');
    }
    if row.success == Some(true) {
        s.push('S');
    }
    if s.is_empty() { "-".to_string() } else { s }
}
