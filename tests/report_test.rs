//! Report schema stability: downstream consumers key on these fields.

use page_translate::geometry::RelBBox;
use page_translate::report::{DetectionRecord, FileReport, Outcome, PageResult, RunReport};

fn sample_report() -> RunReport {
    let mut page = PageResult::new(1);
    page.text_found = true;
    page.record(DetectionRecord {
        source_text: "こんにちは".to_string(),
        translated_text: "Hello".to_string(),
        bounding_box: Some(RelBBox {
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.05,
        }),
        outcome: Outcome::Rendered,
    });
    page.record(DetectionRecord {
        source_text: "ありがとう".to_string(),
        translated_text: String::new(),
        bounding_box: None,
        outcome: Outcome::SkippedNoBbox,
    });

    RunReport::assemble(
        vec![FileReport {
            file: "doc.pdf".to_string(),
            total_pages: 3,
            pages_with_text: 1,
            pages: vec![page],
            error: None,
        }],
        "2026-01-01T00:00:00Z".to_string(),
        12.5,
    )
}

#[test]
fn test_detection_entries_carry_contract_fields() {
    let json = serde_json::to_value(sample_report()).expect("serialize");
    let entry = &json["files"][0]["pages"][0]["detections"][0];

    assert_eq!(entry["source_text"], "こんにちは");
    assert_eq!(entry["translated_text"], "Hello");
    assert_eq!(entry["bounding_box"]["x"], 0.1);
    assert_eq!(entry["bounding_box"]["width"], 0.3);
    assert_eq!(entry["outcome"], "rendered");

    let skipped = &json["files"][0]["pages"][0]["detections"][1];
    assert_eq!(skipped["outcome"], "skipped_no_bbox");
    assert!(skipped["bounding_box"].is_null());
}

#[test]
fn test_aggregate_summary_counts() {
    let json = serde_json::to_value(sample_report()).expect("serialize");
    let meta = &json["metadata"];

    assert_eq!(meta["total_files"], 1);
    assert_eq!(meta["total_pages"], 3);
    assert_eq!(meta["total_detections"], 2);
    assert_eq!(meta["total_replaced"], 1);
    assert_eq!(meta["total_failed"], 1);
    assert_eq!(meta["elapsed_seconds"], 12.5);
    assert_eq!(meta["pipeline"], "page_translate");
}

#[test]
fn test_every_detection_yields_exactly_one_outcome() {
    let report = sample_report();
    let page = &report.files[0].pages[0];
    assert_eq!(
        page.detections.len() as u32,
        page.replaced + page.failed,
        "no silent loss: each detection has one outcome"
    );
}
