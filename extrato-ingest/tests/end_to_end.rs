use chrono::NaiveDate;
use extrato_core::StatementFamily;
use extrato_ingest::{AcquisitionConfig, BatchProcessor, FsTextAcquirer, Pipeline, SourceDocument};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
}

fn fixture_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("extrato-e2e-{}-{}", test, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_treasury_single_line() {
    let pipeline = Pipeline::new().unwrap();
    let text = "Tesouro IPCA 2035 R$ 1.500,00";
    assert_eq!(pipeline.classify(text), StatementFamily::Treasury);

    let stmt = pipeline.parse(text, date());
    assert_eq!(stmt.family(), StatementFamily::Treasury);
    assert_eq!(stmt.balances().len(), 1);
    assert_eq!(stmt.balances().get("Tesouro IPCA 2035"), Some(&1500.0));
}

#[test]
fn test_unrecognised_text_uses_fallback() {
    let pipeline = Pipeline::new().unwrap();
    let text = "Resumo do mês\nValor 1: R$ 200,00\nValor 2: R$ 300,50";
    assert_eq!(pipeline.classify(text), StatementFamily::Other);

    let stmt = pipeline.parse(text, date());
    assert_eq!(stmt.balances().len(), 1);
    assert_eq!(stmt.balances().values().next(), Some(&500.50));
}

#[test]
fn test_extractors_are_repeatable() {
    let pipeline = Pipeline::new().unwrap();
    let samples = [
        "Tesouro Direto\nTesouro Selic 2029 R$ 10,00\nSaldo Tesouro R$ 20,00",
        "Corretora Clear\nRenda Fixa R$ 1,00\nTaxa de corretagem: 0,2%",
        "Banco\nLCI R$ 5,00",
        "PGBL\nTotal R$ 9,00",
        "R$ 1,00 R$ 2,00",
    ];
    for text in samples {
        let family = pipeline.classify(text);
        assert_eq!(pipeline.extract(family, text), pipeline.extract(family, text), "{text}");
    }
}

#[test]
fn test_batch_over_files_on_disk() {
    let dir = fixture_dir("files");
    let tesouro = dir.join("tesouro.txt");
    let previdencia = dir.join("previdencia.txt");
    let foto = dir.join("foto.png");
    fs::write(&tesouro, "TESOURO DIRETO\nTesouro Selic 2029     R$ 2.000,00\n").unwrap();
    fs::write(&previdencia, "Previdência VGBL\nSaldo Total R$ 800,00\n").unwrap();
    fs::write(&foto, [0u8, 1, 2]).unwrap();

    let acquirer = FsTextAcquirer::init(AcquisitionConfig::default()).unwrap();
    let processor = BatchProcessor::new(Arc::new(acquirer))
        .unwrap()
        .with_extraction_date(date());

    let docs: Vec<_> = [&tesouro, &foto, &previdencia]
        .into_iter()
        .map(|p| SourceDocument::from_path(p))
        .collect();
    let report = processor.process(&docs);

    assert_eq!(report.included_count(), 2);
    assert_eq!(report.skipped_count(), 1);

    let statements = report.into_statements();
    assert_eq!(statements[0].balances().get("Tesouro Selic 2029"), Some(&2000.0));
    assert_eq!(statements[1].family(), StatementFamily::Pension);
    assert_eq!(statements[1].balances().get("VGBL"), Some(&800.0));
}
