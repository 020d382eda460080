use crate::domain::allergen::{Allergen, AllergenCategory};

pub const ALLERGENS_PLACEHOLDER: &str = "{{allergens}}";

pub const NO_RESTRICTIONS_INSTRUCTION: &str = "No specific allergens or restrictions provided. In this case, the product should be considered SAFE by default unless there are clear warnings about common allergens.";

pub const SCAN_PROMPT_TEMPLATE: &str = r#"
You are an AI assistant specialized in analyzing food ingredients for allergens and dietary restrictions.
A user has sent you an image of food packaging with ingredients list.

Analyze the ingredients list in the image and check if it contains any of the user's allergens or restrictions listed below:

USER'S ALLERGENS AND RESTRICTIONS:
{{allergens}}

TASK:
1. Extract the product name from the package if visible
2. Identify ALL ingredients shown in the list
3. Check if ANY of the user's allergens or restrictions are present in the ingredients
4. Check for indirect/cross-reactive ingredients (e.g., casein contains milk protein)
5. Determine if the product is safe for the user based on their restrictions

Your response must follow this JSON format strictly:
{
  "productName": "Name of food product",
  "isSafe": true or false,
  "detectedAllergens": [
    {
      "name": "allergen name",
      "found": "exact ingredient text from list",
      "severity": "unsafe" or "caution"
    }
  ],
  "ingredients": "Full ingredients list from the package",
  "recommendation": "Short explanation whether user should avoid or can consume this product",
  "alternativeSuggestion": "Suggestion for allergen-free alternatives if available"
}

Note:
- "severity": "unsafe" means the allergen is definitely present
- "severity": "caution" means possible cross-contamination or similar allergens
- Keep the response concise and focused solely on allergen identification
- If you can't clearly see the ingredients or the image quality is poor, note that in the recommendation field
"#;

/// Renders the allergen block of the scan prompt.
///
/// One line per non-empty category, in [`AllergenCategory::ORDERED`] order.
/// Callers pass only the allergens that are switched on; nothing is filtered
/// here.
pub fn render_allergen_instructions(allergens: &[Allergen]) -> String {
    let mut instructions = String::new();

    for category in AllergenCategory::ORDERED {
        let names: Vec<&str> = allergens
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.name.as_str())
            .collect();

        if names.is_empty() {
            continue;
        }

        instructions.push_str(category.label());
        instructions.push_str(": ");
        instructions.push_str(&names.join(", "));
        instructions.push('\n');
    }

    if instructions.is_empty() {
        return NO_RESTRICTIONS_INSTRUCTION.to_string();
    }

    instructions
}

pub fn build_scan_prompt(allergens: &[Allergen]) -> String {
    SCAN_PROMPT_TEMPLATE.replace(ALLERGENS_PLACEHOLDER, &render_allergen_instructions(allergens))
}
