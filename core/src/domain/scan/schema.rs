use serde_json::json;

/// Returns the JSON schema for scan analysis LLM responses
pub fn get_scan_analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "productName": { "type": "string" },
            "isSafe": { "type": "boolean" },
            "detectedAllergens": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "found": { "type": "string" },
                        "severity": {
                            "type": "string",
                            "enum": ["unsafe", "caution"]
                        }
                    },
                    "required": ["name", "found", "severity"]
                }
            },
            "ingredients": { "type": "string" },
            "recommendation": { "type": "string" },
            "alternativeSuggestion": { "type": "string" }
        },
        "required": [
            "productName", "isSafe", "detectedAllergens",
            "ingredients", "recommendation", "alternativeSuggestion"
        ]
    })
}
