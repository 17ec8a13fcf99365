//! Plain-text and CSV renderings of a consolidated summary

use anyhow::{Context, Result};
use extrato_core::{ExtractedStatement, format_brl};
use std::fmt::Write as _;
use std::io::Write;

use crate::consolidate::ConsolidatedSummary;

/// Human-readable report: one block per statement, then the consolidated totals
pub fn render_text(summary: &ConsolidatedSummary, statements: &[ExtractedStatement]) -> String {
    let mut s = String::new();

    let _ = writeln!(s, "# Extratos ({})\n", statements.len());
    for stmt in statements {
        let _ = writeln!(
            s,
            "## {} [{}] {}",
            stmt.source().unwrap_or("(sem nome)"),
            stmt.family(),
            stmt.extraction_date()
        );
        for (label, amount) in stmt.balances() {
            let _ = writeln!(s, "- {}: {}", label, format_brl(*amount));
        }
        for (label, rate) in stmt.fee_rates() {
            let _ = writeln!(s, "- {}: {:.2}%", label, rate);
        }
        s.push('\n');
    }

    let _ = writeln!(s, "# Consolidado\n");
    for row in summary.allocation() {
        let _ = writeln!(
            s,
            "- {}: {} ({:.1}%)",
            row.label,
            format_brl(row.amount),
            row.share * 100.0
        );
    }
    let _ = writeln!(s, "\nTotal: {}", format_brl(summary.total_overall));

    if !summary.implied_fee_rates.is_empty() {
        let _ = writeln!(s, "\n# Taxas implícitas\n");
        for (label, rate) in &summary.implied_fee_rates {
            let _ = writeln!(s, "- {}: {:.2}%", label, rate);
        }
    }

    s
}

/// Write `class,amount,share` rows (largest class first) followed by a total row
pub fn write_csv<W: Write>(summary: &ConsolidatedSummary, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["class", "amount", "share"])
        .context("writing csv header")?;

    for row in summary.allocation() {
        let amount = format!("{:.2}", row.amount);
        let share = format!("{:.4}", row.share);
        wtr.write_record([row.label.as_str(), amount.as_str(), share.as_str()])
            .with_context(|| format!("writing csv row {}", row.label))?;
    }

    let total = format!("{:.2}", summary.total_overall);
    let total_share = if summary.is_empty() { "0.0000" } else { "1.0000" };
    wtr.write_record(["total", total.as_str(), total_share])
        .context("writing csv total")?;
    wtr.flush().context("flushing csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;
    use chrono::NaiveDate;
    use extrato_core::StatementFamily;

    fn statements() -> Vec<ExtractedStatement> {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut xp = ExtractedStatement::new(StatementFamily::Brokerage, date).with_source("xp.pdf");
        xp.insert_balance("Renda Fixa", 12500.0);
        xp.insert_fee_rate("Taxa", 0.5);
        let mut bb = ExtractedStatement::new(StatementFamily::Bank, date).with_source("bb.pdf");
        bb.insert_balance("CDB", 7500.0);
        vec![xp, bb]
    }

    #[test]
    fn test_text_report_sections() {
        let stmts = statements();
        let text = render_text(&consolidate(&stmts), &stmts);
        assert!(text.contains("## xp.pdf [Corretora] 2026-03-01"));
        assert!(text.contains("- Renda Fixa: R$ 12.500,00 (62.5%)"));
        assert!(text.contains("- CDB: R$ 7.500,00 (37.5%)"));
        assert!(text.contains("Total: R$ 20.000,00"));
        assert!(text.contains("- Taxa: 0.50%"));
    }

    #[test]
    fn test_csv_rows() {
        let stmts = statements();
        let mut buf = Vec::new();
        write_csv(&consolidate(&stmts), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "class,amount,share");
        assert_eq!(lines[1], "Renda Fixa,12500.00,0.6250");
        assert_eq!(lines[2], "CDB,7500.00,0.3750");
        assert_eq!(lines[3], "total,20000.00,1.0000");
    }

    #[test]
    fn test_csv_for_empty_summary() {
        let mut buf = Vec::new();
        write_csv(&consolidate(&[]), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, vec!["class,amount,share", "total,0.00,0.0000"]);
    }
}
