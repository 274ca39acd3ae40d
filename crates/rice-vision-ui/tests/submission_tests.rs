//! Integration tests for submission, failure collapse and resubmission policy.

mod common;

use rice_vision_core::Severity;
use rice_vision_ui::{
    Notification, PresentationState, SubmissionOutcome, SubmitRejection, UiEffect,
    SCROLL_TO_RESULTS_DELAY,
};
use rice_vision_upload::FailureClass;

#[tokio::test]
async fn submission_tests_missing_candidate_makes_no_call() {
    let transport = common::replying(200, r#"{"disease":"Rice Blast","confidence":91.2}"#);
    let mut controller = common::controller(transport.clone());

    let outcome = controller.submit_for_analysis().await;

    assert_eq!(outcome, SubmissionOutcome::Rejected(SubmitRejection::NoCandidate));
    assert!(transport.calls().is_empty());
    assert_eq!(controller.state(), PresentationState::Empty);
    assert_eq!(
        controller.take_effects(),
        vec![UiEffect::Toast(Notification::error("Please select an image first"))]
    );
}

#[tokio::test]
async fn submission_tests_minimal_reply_gets_defaults() {
    let transport = common::replying(200, r#"{"disease":"Rice Blast","confidence":91.2}"#);
    let mut controller = common::controller(transport.clone());
    controller.select_file(common::dropped("leaf.jpg", "image/jpeg", vec![1, 2, 3]));

    let SubmissionOutcome::Populated(result) = controller.submit_for_analysis().await else {
        panic!("submission should populate");
    };

    assert_eq!(result.severity, Severity::Moderate);
    assert!(result.description.contains("Rice Blast"));
    assert!(!result.treatment.is_empty());
    assert_eq!(transport.calls().len(), 1);
    assert_eq!(transport.calls()[0].bytes, vec![1, 2, 3]);
    assert_eq!(
        controller.take_effects(),
        vec![
            UiEffect::Toast(Notification::success("Prediction: Rice Blast")),
            UiEffect::ScrollToResults {
                after: SCROLL_TO_RESULTS_DELAY
            },
        ]
    );
}

#[tokio::test]
async fn submission_tests_every_failure_kind_lands_in_error_state() {
    let cases = [
        (common::replying(500, r#"{"error":"Inference failed"}"#), FailureClass::Server),
        (common::unreachable(), FailureClass::Transport),
        (common::replying(200, "definitely not json"), FailureClass::Contract),
    ];

    for (transport, expected_class) in cases {
        let mut controller = common::controller(transport);
        controller.select_file(common::dropped("leaf.png", "image/png", vec![4, 5]));

        let outcome = controller.submit_for_analysis().await;

        let SubmissionOutcome::Failed(failure) = outcome else {
            panic!("submission should fail for {expected_class:?}");
        };
        assert_eq!(failure.class, expected_class);
        assert_eq!(controller.state(), PresentationState::Error);
        assert!(controller.result().is_none());
        assert_eq!(
            controller.take_effects(),
            vec![UiEffect::Toast(Notification::error("Error analyzing image"))]
        );
    }
}

#[tokio::test]
async fn submission_tests_second_submit_while_loading_is_ignored() {
    let transport = common::replying(200, r#"{"disease":"Tungro","confidence":40}"#);
    let mut controller = common::controller(transport.clone());
    controller.select_file(common::dropped("leaf.png", "image/png", vec![1]));

    let pending = controller.begin_submission().expect("first submission starts");
    assert_eq!(controller.state(), PresentationState::Loading);
    assert!(matches!(controller.begin_submission(), Err(SubmitRejection::InFlight)));

    let outcome = controller.complete_submission(pending.run().await);
    assert!(matches!(outcome, SubmissionOutcome::Populated(_)));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn submission_tests_completion_after_clear_is_discarded() {
    let transport = common::replying(200, r#"{"disease":"Tungro","confidence":40}"#);
    let mut controller = common::controller(transport);
    controller.select_file(common::dropped("leaf.png", "image/png", vec![1]));

    let pending = controller.begin_submission().expect("submission starts");
    controller.clear_selection();
    let outcome = controller.complete_submission(pending.run().await);

    assert_eq!(outcome, SubmissionOutcome::Discarded);
    assert_eq!(controller.state(), PresentationState::Empty);
}

#[tokio::test]
async fn submission_tests_completion_after_replacement_is_discarded() {
    let transport = common::replying(200, r#"{"disease":"Tungro","confidence":40}"#);
    let mut controller = common::controller(transport);
    controller.select_file(common::dropped("old.png", "image/png", vec![1]));

    let pending = controller.begin_submission().expect("submission starts");
    controller.select_file(common::dropped("new.png", "image/png", vec![2]));
    let outcome = controller.complete_submission(pending.run().await);

    assert_eq!(outcome, SubmissionOutcome::Discarded);
    assert_eq!(controller.state(), PresentationState::Ready);
}

#[tokio::test]
async fn submission_tests_failed_submission_can_be_retried_by_user() {
    let mut controller = common::controller(common::replying(503, ""));
    controller.select_file(common::dropped("leaf.png", "image/png", vec![1]));

    assert!(matches!(controller.submit_for_analysis().await, SubmissionOutcome::Failed(_)));
    assert!(controller.begin_submission().is_ok());
    assert_eq!(controller.state(), PresentationState::Loading);
}
