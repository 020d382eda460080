use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AllergenCategory {
    Common,
    Dietary,
    Religious,
    Custom,
}

impl AllergenCategory {
    /// Order in which categories are rendered into the prompt.
    pub const ORDERED: [AllergenCategory; 4] = [
        AllergenCategory::Common,
        AllergenCategory::Dietary,
        AllergenCategory::Religious,
        AllergenCategory::Custom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AllergenCategory::Common => "Common Allergens",
            AllergenCategory::Dietary => "Dietary Restrictions",
            AllergenCategory::Religious => "Religious/Ethical Restrictions",
            AllergenCategory::Custom => "Custom Restrictions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Allergen {
    pub id: String,
    pub name: String,
    pub category: AllergenCategory,
    pub selected: bool,
}

impl Allergen {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: AllergenCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            selected: true,
        }
    }
}

/// Keeps only the allergens the user has switched on, preserving order.
pub fn selected_allergens(allergens: &[Allergen]) -> Vec<Allergen> {
    allergens.iter().filter(|a| a.selected).cloned().collect()
}
