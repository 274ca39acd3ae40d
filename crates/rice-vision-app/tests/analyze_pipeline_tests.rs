//! Integration tests for the select -> submit -> present pipeline.

mod common;

use rice_vision_app::{AppError, analyze_path};
use rice_vision_ui::{NotificationLevel, PresentationState, RenderedView, UiEffect};

#[tokio::test]
async fn analyze_pipeline_tests_renders_populated_card_from_mock() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = common::write_file(dir.path(), "paddy.png", common::FAKE_IMAGE);
    let mut controller = common::mock_controller(11);

    let report = analyze_path(&mut controller, &common::presenter(), &path)
        .await
        .expect("analysis should run");

    assert!(report.succeeded());
    let PresentationState::Populated(result) = &report.state else {
        panic!("expected populated state, got {:?}", report.state);
    };
    let Some(RenderedView::Populated(card)) = &report.view else {
        panic!("expected populated view, got {:?}", report.view);
    };
    assert_eq!(card.disease, result.disease);
    assert!(
        card.image
            .as_deref()
            .is_some_and(|uri| uri.starts_with("data:image/png;base64,"))
    );
    assert!(report.effects.iter().any(|effect| matches!(
        effect,
        UiEffect::Toast(notification)
            if notification.level == NotificationLevel::Success
                && notification.message == format!("Prediction: {}", result.disease)
    )));
    assert!(
        report
            .effects
            .iter()
            .any(|effect| matches!(effect, UiEffect::ScrollToResults { .. }))
    );
}

#[tokio::test]
async fn analyze_pipeline_tests_unsupported_extension_is_rejected_without_submit() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = common::write_file(dir.path(), "notes.txt", b"plain text");
    let mut controller = common::mock_controller(3);

    let report = analyze_path(&mut controller, &common::presenter(), &path)
        .await
        .expect("pipeline should report the refusal");

    assert!(!report.succeeded());
    assert_eq!(report.state, PresentationState::Empty);
    assert_eq!(report.view, None);
    assert!(report.effects.iter().any(|effect| matches!(
        effect,
        UiEffect::Toast(notification)
            if notification.level == NotificationLevel::Error
                && notification.message == "Please upload a valid image file"
    )));
}

#[tokio::test]
async fn analyze_pipeline_tests_empty_file_surfaces_generic_failure() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = common::write_file(dir.path(), "empty.png", b"");
    let mut controller = common::mock_controller(5);

    let report = analyze_path(&mut controller, &common::presenter(), &path)
        .await
        .expect("pipeline should report the failure");

    assert_eq!(report.state, PresentationState::Error);
    assert_eq!(report.view, None);
    assert!(report.effects.iter().any(|effect| matches!(
        effect,
        UiEffect::Toast(notification) if notification.message == "Error analyzing image"
    )));
}

#[tokio::test]
async fn analyze_pipeline_tests_missing_file_is_a_selection_error() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let mut controller = common::mock_controller(7);

    let error = analyze_path(
        &mut controller,
        &common::presenter(),
        &dir.path().join("absent.jpg"),
    )
    .await
    .expect_err("missing file should fail");

    assert!(matches!(error, AppError::Selection(_)));
    assert_eq!(controller.state(), PresentationState::Empty);
}
