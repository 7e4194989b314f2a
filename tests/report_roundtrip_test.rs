//! Address file in, CSV report out, with mock collaborators in between.

use chrono::{TimeZone, Utc};
use ethers::types::H256;
use passport_attest::attestation::{MockSubmitter, SubmitError};
use passport_attest::domain::{Address, ScoreRecord};
use passport_attest::io::{read_addresses_file, write_report_file};
use passport_attest::orchestration::{Pipeline, PipelineSettings};
use passport_attest::scorer::MockScoreSource;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn record(score: &str) -> ScoreRecord {
    ScoreRecord {
        score: score.to_string(),
        threshold: "20".to_string(),
        passing_score: false,
        expiration_timestamp: Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap(),
        stamps: Vec::new(),
    }
}

#[tokio::test]
async fn file_to_report() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("addresses.txt");
    let output = temp.path().join("results.csv");

    std::fs::write(
        &input,
        "0x00000000000000000000000000000000000000a1\n\
         garbage line\n\
         0x00000000000000000000000000000000000000a2\n\
         0x00000000000000000000000000000000000000a3\n",
    )
    .unwrap();

    let addresses = read_addresses_file(&input).unwrap();
    assert_eq!(addresses.len(), 3);

    let a1 = addresses[0];
    let a2 = addresses[1];
    let a3 = addresses[2];

    let scorer = Arc::new(
        MockScoreSource::new()
            .with_record(a1, record("12.5"))
            .with_reported_error(a2, "Address not found")
            .with_record(a3, record("3")),
    );
    let submitter = Arc::new(
        MockSubmitter::new().with_failure(
            a3,
            SubmitError::Rpc("replacement transaction underpriced".to_string()),
        ),
    );
    let pipeline = Pipeline::new(
        scorer,
        submitter,
        PipelineSettings {
            scorer_id: 1,
            schema_uid: H256::zero(),
            score_decimals: 4,
            batch_size: 2,
            request_delay: Duration::ZERO,
        },
    );

    let outcomes = pipeline.run(&addresses).await;
    write_report_file(&output, &outcomes).unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["address", "score", "tx_hash", "error"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    assert_eq!(&rows[0][0], Address::to_string(&a1));
    assert_eq!(&rows[0][1], "12.5");
    assert!(rows[0][2].starts_with("0x"));
    assert_eq!(&rows[0][3], "");

    assert_eq!(&rows[1][1], "0");
    assert_eq!(&rows[1][2], "");
    assert_eq!(&rows[1][3], "Address not found");

    assert_eq!(&rows[2][1], "3");
    assert_eq!(&rows[2][2], "");
    assert_eq!(&rows[2][3], "replacement transaction underpriced");
}
