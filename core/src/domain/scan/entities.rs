use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The allergen is explicitly listed.
    Unsafe,
    /// Inferred or cross-reactive presence.
    Caution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetectedAllergen {
    pub name: String,
    pub found: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    Safe,
    Unsafe,
    Indeterminate,
}

impl From<Option<bool>> for SafetyVerdict {
    fn from(is_safe: Option<bool>) -> Self {
        match is_safe {
            Some(true) => SafetyVerdict::Safe,
            Some(false) => SafetyVerdict::Unsafe,
            None => SafetyVerdict::Indeterminate,
        }
    }
}

impl From<SafetyVerdict> for Option<bool> {
    fn from(verdict: SafetyVerdict) -> Self {
        match verdict {
            SafetyVerdict::Safe => Some(true),
            SafetyVerdict::Unsafe => Some(false),
            SafetyVerdict::Indeterminate => None,
        }
    }
}

/// What the vision model said about a label, after field fallbacks but before
/// any refinement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAnalysis {
    pub product_name: String,
    pub is_safe: bool,
    pub detected_allergens: Vec<DetectedAllergen>,
    pub ingredients: String,
    pub recommendation: String,
    pub alternative_suggestion: String,
}

impl From<ScanResponse> for ScanAnalysis {
    /// Feeds a finished response back into refinement. An indeterminate
    /// verdict comes back as unsafe; its retake guidance keeps it unclear.
    fn from(response: ScanResponse) -> Self {
        Self {
            product_name: response.product_name,
            is_safe: response.is_safe.unwrap_or(false),
            detected_allergens: response.detected_allergens,
            ingredients: response.ingredients,
            recommendation: response.recommendation,
            alternative_suggestion: response.alternative_suggestion,
        }
    }
}

/// Final verdict handed back to the caller. `is_safe` is `null` when the
/// photo was not good enough to decide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub product_name: String,
    pub is_safe: Option<bool>,
    pub detected_allergens: Vec<DetectedAllergen>,
    pub ingredients: String,
    pub recommendation: String,
    pub alternative_suggestion: String,
}

impl ScanResponse {
    pub fn verdict(&self) -> SafetyVerdict {
        SafetyVerdict::from(self.is_safe)
    }
}

/// A response as kept by a history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: ScanResponse,
}

impl ScanRecord {
    pub fn new(result: ScanResponse) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            created_at: now,
            result,
        }
    }
}
