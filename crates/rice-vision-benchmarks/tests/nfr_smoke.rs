//! Benchmark smoke test for the local selection and normalization loop.

use std::time::Instant;

use rice_vision_analysis_contract::parse_classification_response;
use rice_vision_core::{CandidateImage, SelectedFile};

#[test]
fn benchmark_pipeline_smoke_prints_latency() {
    let image = vec![0x5a_u8; 4 * 1024 * 1024];
    let raw = r#"{
        "disease":"Bacterial Leaf Blight",
        "confidence":88.25,
        "severity":"High"
    }"#;

    let start = Instant::now();
    let mut preview_bytes = 0usize;
    let mut labels = 0usize;

    for _ in 0..20 {
        let candidate = CandidateImage::from_selection(SelectedFile::from_bytes(
            "paddy.jpg",
            "image/jpeg",
            image.clone(),
        ))
        .expect("candidate should be accepted");
        preview_bytes += candidate.preview_data_uri().len();

        let result = parse_classification_response(raw).expect("response should parse");
        labels += result.confidence_label().len();
    }

    let elapsed_ms = start.elapsed().as_millis();
    println!("benchmark_pipeline_elapsed_ms={elapsed_ms}");
    println!("benchmark_preview_total_bytes={preview_bytes}");
    println!("benchmark_confidence_label_total_len={labels}");

    // This is a lightweight guardrail; strict NFR checks are environment-specific.
    assert!(
        elapsed_ms < 5_000,
        "pipeline smoke benchmark should stay bounded"
    );
}
