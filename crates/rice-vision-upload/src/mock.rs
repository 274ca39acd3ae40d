//! Offline stand-in for the classification service.
//!
//! Picks a disease at random from a fixed table and answers with the same JSON
//! shape the real service uses, so replies still go through the contract
//! parser.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use url::Url;

use crate::{ClassificationRequest, ClassificationTransport, TransportResponse, UploadError};

/// Chance that the mock reports a healthy leaf.
const HEALTHY_PROBABILITY: f64 = 0.3;

/// One entry of the mock disease table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDisease {
    /// Disease label.
    pub name: &'static str,
    /// Severity label.
    pub severity: &'static str,
    /// Explanation text.
    pub description: &'static str,
    /// Treatment text.
    pub treatment: &'static str,
}

const DISEASES: [MockDisease; 5] = [
    MockDisease {
        name: "Rice Blast",
        severity: "high",
        description: "Rice blast is a destructive fungal disease caused by Magnaporthe oryzae. \
            It can affect all above-ground parts of the rice plant and is particularly damaging \
            to leaves and panicles.",
        treatment: "Apply fungicides like propiconazole or tricyclazole at first signs. Plant \
            resistant varieties and maintain proper field drainage.",
    },
    MockDisease {
        name: "Bacterial Leaf Blight",
        severity: "medium",
        description: "Bacterial leaf blight is caused by Xanthomonas oryzae pv. oryzae. It \
            appears as water-soaked lesions on leaf edges that turn yellow and dry out.",
        treatment: "Use copper-based bactericides as preventive measures. Plant resistant \
            varieties and remove infected plant debris.",
    },
    MockDisease {
        name: "Brown Spot",
        severity: "medium",
        description: "Brown spot is a fungal disease caused by Cochliobolus miyabeanus. It \
            appears as brown, oval lesions with yellow halos on leaves.",
        treatment: "Apply balanced fertilization, especially adequate potassium. Use fungicides \
            like iprodione or propiconazole.",
    },
    MockDisease {
        name: "Sheath Blight",
        severity: "high",
        description: "Sheath blight is caused by Rhizoctonia solani and appears as oval lesions \
            on the leaf sheath that can spread to the leaves.",
        treatment: "Apply fungicides like azoxystrobin or hexaconazole. Reduce planting density \
            and avoid excessive nitrogen.",
    },
    MockDisease {
        name: "Leaf Scald",
        severity: "low",
        description: "Leaf scald is caused by the fungus Microdochium oryzae. It appears as \
            zonate lesions with alternating light and dark brown bands.",
        treatment: "Use balanced fertilization and proper water management. Apply fungicides \
            like propiconazole.",
    },
];

/// Diseases the mock can report.
pub fn mock_disease_table() -> &'static [MockDisease] {
    &DISEASES
}

/// Seedable random classifier implementing [`ClassificationTransport`].
#[derive(Debug)]
pub struct MockClassifier {
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl MockClassifier {
    /// Creates a deterministic mock with no artificial latency.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: Duration::ZERO,
        }
    }

    /// Creates a mock seeded from the system clock.
    pub fn from_clock() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(seed)
    }

    /// Delays every reply by `latency` to imitate inference time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn next_reply(&self) -> Result<serde_json::Value, UploadError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| UploadError::Transport("mock rng lock poisoned".to_string()))?;

        let confidence = rng.random_range(70.0..95.0);
        if rng.random_bool(HEALTHY_PROBABILITY) {
            return Ok(serde_json::json!({
                "disease": "Healthy",
                "confidence": confidence,
                "severity": "none",
                "description": "The rice leaf is healthy.",
                "treatment": "No action needed.",
            }));
        }

        let disease = DISEASES[rng.random_range(0..DISEASES.len())];
        Ok(serde_json::json!({
            "disease": disease.name,
            "confidence": confidence,
            "severity": disease.severity,
            "description": disease.description,
            "treatment": disease.treatment,
        }))
    }
}

#[async_trait]
impl ClassificationTransport for MockClassifier {
    async fn post_image(
        &self,
        _endpoint: &Url,
        request: &ClassificationRequest,
    ) -> Result<TransportResponse, UploadError> {
        if request.bytes.is_empty() {
            return Ok(TransportResponse {
                status: 400,
                body: r#"{"error":"No image provided"}"#.to_string(),
            });
        }

        let reply = self.next_reply()?;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        Ok(TransportResponse {
            status: 200,
            body: reply.to_string(),
        })
    }

    async fn probe(&self, _endpoint: &Url) -> Result<u16, UploadError> {
        Ok(200)
    }
}
