//! CSV and JSON exports of harvested records

use anyhow::Result;
use review_harvester::export::CSV_COLUMNS;
use review_harvester::{CsvSink, JsonSink, RecordExtractor, RecordSink, ReviewRecord, sink_for_path};
use tempfile::TempDir;

mod common;
use common::{CardParts, card, listing_document, review_card};

fn sample_records() -> Result<Vec<ReviewRecord>> {
    let html = listing_document(&[
        review_card(0),
        card(CardParts {
            author: Some("Pat, from \"Leeds\"".into()),
            body: Some("Seat 3A<br>No legroom".into()),
            stars_src: Some("/stars/stars-1.svg".into()),
            ..CardParts::default()
        }),
    ]);
    Ok(RecordExtractor::new()?.extract(&html)?.records)
}

#[test]
fn csv_export_has_header_and_one_row_per_record() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("nested").join("reviews.csv");
    let records = sample_records()?;

    let written = CsvSink::new(&path).persist(&records)?;
    assert_eq!(written, 2);

    let mut reader = csv::Reader::from_path(&path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    assert_eq!(headers, CSV_COLUMNS);

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "January 05, 2024");
    assert_eq!(&rows[0][1], "Reviewer 0");
    assert_eq!(&rows[0][4], "1");
    assert_eq!(&rows[0][5], "true");

    assert_eq!(&rows[1][0], "not specified");
    assert_eq!(&rows[1][1], "Pat, from \"Leeds\"");
    assert_eq!(&rows[1][2], "not specified");
    assert_eq!(&rows[1][3], "Seat 3A\nNo legroom");
    assert_eq!(&rows[1][4], "1");
    assert_eq!(&rows[1][5], "false");
    Ok(())
}

#[test]
fn csv_export_overwrites_previous_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("reviews.csv");
    std::fs::write(&path, "stale contents\nfrom an earlier run\n")?;

    CsvSink::new(&path).persist(&[])?;

    let contents = std::fs::read_to_string(&path)?;
    assert_eq!(contents, format!("{}\n", CSV_COLUMNS.join(",")));
    Ok(())
}

#[test]
fn json_export_is_an_array_of_records() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("reviews.json");
    let records = sample_records()?;

    JsonSink::new(&path).persist(&records)?;

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let rows = value.as_array().expect("top-level array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["author"], "Reviewer 0");
    assert_eq!(rows[0]["overall_rating"], 1);
    assert_eq!(rows[0]["verified"], true);
    assert_eq!(rows[1]["date"], "not specified");
    Ok(())
}

#[test]
fn sink_is_chosen_by_extension() -> Result<()> {
    let dir = TempDir::new()?;
    let records = sample_records()?;

    let json_path = dir.path().join("out.JSON");
    sink_for_path(&json_path).persist(&records)?;
    assert!(std::fs::read_to_string(&json_path)?.trim_start().starts_with('['));

    let csv_path = dir.path().join("out.tsv");
    sink_for_path(&csv_path).persist(&records)?;
    assert!(std::fs::read_to_string(&csv_path)?.starts_with("date,author"));
    Ok(())
}
