use chrono::NaiveDate;
use extrato_core::{ExtractedStatement, StatementFamily};
use extrato_finance::consolidate;
use extrato_ingest::Pipeline;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
}

fn grand_total(statements: &[ExtractedStatement]) -> f64 {
    statements.iter().flat_map(|s| s.balances().values()).sum()
}

/// Text -> classify -> extract -> consolidate for a single treasury line
#[test]
fn test_single_treasury_statement() {
    let pipeline = Pipeline::new().unwrap();
    let stmt = pipeline.parse("Tesouro IPCA 2035 R$ 1.500,00", date());
    assert_eq!(stmt.family(), StatementFamily::Treasury);

    let summary = consolidate(&[stmt]);
    assert_eq!(summary.totals_by_class.len(), 1);
    assert_eq!(summary.totals_by_class.get("Tesouro IPCA 2035"), Some(&1500.0));
    assert_eq!(summary.total_overall, 1500.0);
    assert!(summary.implied_fee_rates.is_empty());
}

#[test]
fn test_mixed_portfolio() {
    let pipeline = Pipeline::new().unwrap();
    let texts = [
        "TESOURO DIRETO\nTesouro Selic 2029 R$ 10.000,00\nTesouro IPCA+ 2035 R$ 5.000,00",
        "XP Investimentos\nRenda Fixa R$ 20.000,00\nRenda Variável R$ 7.500,50\nTaxa de administração: 0,50%",
        "Genial Investimentos\nRenda Fixa R$ 3.000,00\nTaxa de corretagem: 0,25%",
        "Banco do Brasil\nCDB R$ 4.000,00\nPoupança R$ 999,50",
        "Previdência PGBL\nSaldo Total R$ 50.000,00",
        "Resumo\nR$ 100,00\nR$ 200,00",
    ];
    let statements: Vec<_> = texts.iter().map(|t| pipeline.parse(t, date())).collect();

    let families: Vec<_> = statements.iter().map(|s| s.family()).collect();
    assert_eq!(
        families,
        vec![
            StatementFamily::Treasury,
            StatementFamily::Brokerage,
            StatementFamily::Brokerage,
            StatementFamily::Bank,
            StatementFamily::Pension,
            StatementFamily::Other,
        ]
    );

    let summary = consolidate(&statements);
    assert_eq!(summary.totals_by_class.get("Renda Fixa"), Some(&23000.0));
    assert_eq!(summary.totals_by_class.get("PGBL"), Some(&50000.0));
    // "Poupança" on the bank statement and the fallback both land in Aplicações
    assert_eq!(summary.totals_by_class.get("Aplicações"), Some(&1299.5));
    assert_eq!(summary.implied_fee_rates.get("Taxa"), Some(&0.75));
    assert_eq!(summary.total_overall, grand_total(&statements));
}

#[test]
fn test_total_independent_of_partitioning() {
    let date = date();
    let mut whole = ExtractedStatement::new(StatementFamily::Bank, date);
    whole.insert_balance("CDB", 1200.25);
    whole.insert_balance("LCI", 800.75);

    let mut first = ExtractedStatement::new(StatementFamily::Bank, date);
    first.insert_balance("CDB", 1200.25);
    let mut second = ExtractedStatement::new(StatementFamily::Bank, date);
    second.insert_balance("LCI", 800.75);

    let a = consolidate(&[whole]);
    let b = consolidate(&[first, second]);
    assert_eq!(a.totals_by_class, b.totals_by_class);
    assert_eq!(a.total_overall, b.total_overall);
}

#[test]
fn test_consolidation_is_deterministic() {
    let pipeline = Pipeline::new().unwrap();
    let statements: Vec<_> = [
        "Banco\nCDB R$ 0,10\nLCA R$ 0,20",
        "Banco\nCDB R$ 0,30",
        "Corretora\nFundos R$ 1.234,56",
    ]
    .iter()
    .map(|t| pipeline.parse(t, date()))
    .collect();

    let first = consolidate(&statements);
    let second = consolidate(&statements);
    assert_eq!(first, second);
    assert_eq!(first.total_overall, grand_total(&statements));
}
