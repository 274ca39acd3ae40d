//! Shared fixtures for app integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rice_vision_ui::{HandoffInbox, ResultPresenter, UploadController};
use rice_vision_upload::{ClassifierClient, MockClassifier};

/// Bytes of a file that only needs to look like an image to the controller.
pub const FAKE_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

/// Controller over a seeded mock classifier.
pub fn mock_controller(seed: u64) -> UploadController {
    let client = ClassifierClient::new(
        "https://classifier.example.test/",
        Arc::new(MockClassifier::seeded(seed)),
    )
    .expect("fixture endpoint should be valid");
    UploadController::new(client)
}

/// Presenter with an empty inbox.
pub fn presenter() -> ResultPresenter {
    ResultPresenter::new(Arc::new(HandoffInbox::new()))
}

/// Writes `bytes` to `name` inside `dir`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("fixture file should be writable");
    path
}
