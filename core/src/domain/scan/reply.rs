use serde::Deserialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    scan::entities::{DetectedAllergen, ScanAnalysis, Severity},
};

pub const UNIDENTIFIED_PRODUCT: &str = "Unable to identify product";
pub const INGREDIENTS_NOT_EXTRACTED: &str = "Could not extract ingredients clearly";
pub const NO_RECOMMENDATION: &str = "No specific recommendation available.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanReply {
    #[serde(alias = "product_name")]
    product_name: Option<String>,
    #[serde(alias = "is_safe")]
    is_safe: Option<bool>,
    #[serde(alias = "detected_allergens")]
    detected_allergens: Option<Vec<ReplyFinding>>,
    ingredients: Option<String>,
    recommendation: Option<String>,
    #[serde(alias = "alternative_suggestion")]
    alternative_suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyFinding {
    name: Option<String>,
    found: Option<String>,
    severity: Option<String>,
}

/// Parses the model's JSON reply into a [`ScanAnalysis`].
///
/// Only an unreadable reply is an error. Missing or blank fields fall back
/// to fixed placeholders, and a missing verdict counts as unsafe.
pub fn parse_scan_reply(raw: &str) -> Result<ScanAnalysis, CoreError> {
    let json = extract_json(raw);
    if json.is_empty() {
        return Err(CoreError::ServiceError("Empty response from LLM".to_string()));
    }

    let reply: ScanReply = serde_json::from_str(json).map_err(|e| {
        tracing::error!("Failed to parse LLM response: {}", e);
        CoreError::ServiceError(format!("Failed to parse LLM response: {}", e))
    })?;

    Ok(reply.into())
}

/// Strips markdown code fences some models wrap around JSON output.
fn extract_json(response: &str) -> &str {
    let response = response.trim();

    if let Some(fenced) = response.strip_prefix("```") {
        let body = fenced.split_once('\n').map_or("", |(_, body)| body);
        return body.trim_end().trim_end_matches("```").trim();
    }

    response
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<ScanReply> for ScanAnalysis {
    fn from(reply: ScanReply) -> Self {
        let mut detected_allergens: Vec<DetectedAllergen> = Vec::new();

        for finding in reply.detected_allergens.unwrap_or_default() {
            let Some(name) = non_blank(finding.name) else {
                continue;
            };
            let found = non_blank(finding.found).unwrap_or_else(|| name.clone());
            let severity = match finding.severity.as_deref().map(str::trim) {
                Some(s) if s.eq_ignore_ascii_case("caution") => Severity::Caution,
                _ => Severity::Unsafe,
            };

            let key = found.trim().to_lowercase();
            if detected_allergens
                .iter()
                .any(|d| d.found.trim().to_lowercase() == key)
            {
                continue;
            }

            detected_allergens.push(DetectedAllergen {
                name,
                found,
                severity,
            });
        }

        Self {
            product_name: non_blank(reply.product_name)
                .unwrap_or_else(|| UNIDENTIFIED_PRODUCT.to_string()),
            is_safe: reply.is_safe.unwrap_or(false),
            detected_allergens,
            ingredients: non_blank(reply.ingredients)
                .unwrap_or_else(|| INGREDIENTS_NOT_EXTRACTED.to_string()),
            recommendation: non_blank(reply.recommendation)
                .unwrap_or_else(|| NO_RECOMMENDATION.to_string()),
            alternative_suggestion: reply.alternative_suggestion.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reply_is_parsed() {
        let raw = r#"{
            "productName": "Choco Bites",
            "isSafe": false,
            "detectedAllergens": [
                { "name": "Milk", "found": "skimmed milk powder", "severity": "unsafe" },
                { "name": "Nuts", "found": "may contain traces of hazelnuts", "severity": "caution" }
            ],
            "ingredients": "sugar, cocoa butter, skimmed milk powder, emulsifier (soy lecithin)",
            "recommendation": "Avoid: contains milk.",
            "alternativeSuggestion": "Try a vegan dark chocolate."
        }"#;

        let analysis = parse_scan_reply(raw).unwrap();
        assert_eq!(analysis.product_name, "Choco Bites");
        assert!(!analysis.is_safe);
        assert_eq!(analysis.detected_allergens.len(), 2);
        assert_eq!(analysis.detected_allergens[1].severity, Severity::Caution);
        assert_eq!(analysis.alternative_suggestion, "Try a vegan dark chocolate.");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let analysis = parse_scan_reply("{}").unwrap();

        assert_eq!(analysis.product_name, UNIDENTIFIED_PRODUCT);
        assert!(!analysis.is_safe);
        assert!(analysis.detected_allergens.is_empty());
        assert_eq!(analysis.ingredients, INGREDIENTS_NOT_EXTRACTED);
        assert_eq!(analysis.recommendation, NO_RECOMMENDATION);
        assert_eq!(analysis.alternative_suggestion, "");
    }

    #[test]
    fn test_null_and_blank_fields_fall_back() {
        let raw = r#"{"productName": "  ", "isSafe": null, "ingredients": null, "recommendation": ""}"#;
        let analysis = parse_scan_reply(raw).unwrap();

        assert_eq!(analysis.product_name, UNIDENTIFIED_PRODUCT);
        assert!(!analysis.is_safe);
        assert_eq!(analysis.ingredients, INGREDIENTS_NOT_EXTRACTED);
        assert_eq!(analysis.recommendation, NO_RECOMMENDATION);
    }

    #[test]
    fn test_duplicate_findings_are_suppressed() {
        let raw = r#"{"isSafe": false, "detectedAllergens": [
            { "name": "Milk", "found": "Whey", "severity": "unsafe" },
            { "name": "Dairy", "found": " whey ", "severity": "caution" },
            { "name": "Soy", "found": "soy lecithin", "severity": "unsafe" }
        ]}"#;

        let analysis = parse_scan_reply(raw).unwrap();
        let names: Vec<&str> = analysis
            .detected_allergens
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Milk", "Soy"]);
    }

    #[test]
    fn test_partial_findings_are_normalized() {
        let raw = r#"{"detectedAllergens": [
            { "name": "Egg" },
            { "found": "anonymous" },
            { "name": "Soy", "found": "soya", "severity": "CAUTION" },
            { "name": "Fish", "found": "anchovy", "severity": "severe" }
        ]}"#;

        let findings = parse_scan_reply(raw).unwrap().detected_allergens;
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].found, "Egg");
        assert_eq!(findings[0].severity, Severity::Unsafe);
        assert_eq!(findings[1].severity, Severity::Caution);
        assert_eq!(findings[2].severity, Severity::Unsafe);
    }

    #[test]
    fn test_snake_case_keys_are_accepted() {
        let raw = r#"{"product_name": "Oat Milk", "is_safe": true, "ingredients": "water, oats (10%), rapeseed oil, salt"}"#;
        let analysis = parse_scan_reply(raw).unwrap();

        assert_eq!(analysis.product_name, "Oat Milk");
        assert!(analysis.is_safe);
    }

    #[test]
    fn test_fenced_json_is_unwrapped() {
        let raw = "```json\n{\"productName\": \"Rice Cakes\", \"isSafe\": true}\n```";
        let analysis = parse_scan_reply(raw).unwrap();

        assert_eq!(analysis.product_name, "Rice Cakes");
        assert!(analysis.is_safe);
    }

    #[test]
    fn test_unreadable_reply_is_service_error() {
        for raw in ["", "   ", "I cannot help with that.", "[1, 2, 3]", "{\"isSafe\": "] {
            let err = parse_scan_reply(raw).unwrap_err();
            assert!(matches!(err, CoreError::ServiceError(_)), "{raw:?}");
        }
    }
}
