//! Single-slot inbox for passing one result across a navigation boundary.

use std::sync::{Mutex, PoisonError};

use rice_vision_core::DetectionResult;

/// Result plus the preview it was produced for.
#[derive(Debug, Clone, PartialEq)]
pub struct Handoff {
    /// Detection result to display.
    pub result: DetectionResult,
    /// Preview data-URI, when the writer had one.
    pub preview: Option<String>,
}

/// Last-write-wins slot shared by reference between views.
///
/// [`HandoffInbox::take`] reads and clears in one step, so a handoff is
/// consumed at most once.
#[derive(Debug, Default)]
pub struct HandoffInbox {
    slot: Mutex<Option<Handoff>>,
}

impl HandoffInbox {
    /// Creates an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handoff`, returning whatever it replaced.
    pub fn deposit(&self, handoff: Handoff) -> Option<Handoff> {
        self.lock().replace(handoff)
    }

    /// Stores a result given in its serialized JSON form.
    ///
    /// # Errors
    /// Returns [`serde_json::Error`] when `result_json` is not a detection
    /// result; the inbox is left unchanged.
    pub fn deposit_serialized(
        &self,
        result_json: &str,
        preview: Option<String>,
    ) -> Result<(), serde_json::Error> {
        let result = DetectionResult::from_json(result_json)?;
        self.deposit(Handoff { result, preview });
        Ok(())
    }

    /// Removes and returns the stored handoff.
    pub fn take(&self) -> Option<Handoff> {
        self.lock().take()
    }

    /// Returns `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Handoff>> {
        // The slot holds plain data, so a poisoned guard is still consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
