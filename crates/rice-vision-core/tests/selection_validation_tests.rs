//! Tests type and size validation of selected files.

use rice_vision_core::{
    CandidateImage, FileContents, MAX_IMAGE_BYTES, SelectedFile, SelectionError,
    validate_selection,
};

fn declared(mime: &str, size_bytes: u64) -> SelectedFile {
    SelectedFile {
        name: "leaf".to_string(),
        mime_type: mime.to_string(),
        size_bytes,
        contents: FileContents::Bytes(Vec::new()),
    }
}

#[test]
fn selection_validation_tests_rejects_non_image_types() {
    for mime in ["text/plain", "application/pdf", "image/webp", "image/tiff", "video/png", ""] {
        assert!(
            matches!(
                validate_selection(&declared(mime, 10)),
                Err(SelectionError::UnsupportedType(_))
            ),
            "{mime:?} should be rejected"
        );
    }
}

#[test]
fn selection_validation_tests_accepts_every_allowed_type_in_any_case() {
    for mime in ["image/jpeg", "IMAGE/JPG", "image/Png", "image/gif", "image/BMP"] {
        validate_selection(&declared(mime, 10)).expect("allowed type should pass");
    }
}

#[test]
fn selection_validation_tests_size_limit_is_inclusive() {
    validate_selection(&declared("image/png", MAX_IMAGE_BYTES)).expect("limit is inclusive");

    assert_eq!(
        validate_selection(&declared("image/png", MAX_IMAGE_BYTES + 1)),
        Err(SelectionError::TooLarge {
            size: MAX_IMAGE_BYTES + 1,
            limit: MAX_IMAGE_BYTES,
        })
    );
}

#[test]
fn selection_validation_tests_oversized_file_is_rejected_before_read() {
    // A missing path would be unreadable; the size check must fire first.
    let file = SelectedFile {
        name: "huge.png".to_string(),
        mime_type: "image/png".to_string(),
        size_bytes: MAX_IMAGE_BYTES + 1,
        contents: FileContents::Path("/definitely/not/here.png".into()),
    };

    assert!(matches!(
        CandidateImage::from_selection(file),
        Err(SelectionError::TooLarge { .. })
    ));
}

#[test]
fn selection_validation_tests_accepts_exact_limit_buffer() {
    let bytes = vec![0_u8; MAX_IMAGE_BYTES as usize];
    let file = SelectedFile::from_bytes("exact.jpg", "image/jpeg", bytes);

    let candidate = CandidateImage::from_selection(file).expect("exact limit is accepted");
    assert_eq!(candidate.size_bytes(), MAX_IMAGE_BYTES);
}
