//! Ingredients that can betray the hidden presence of an allergen.
//!
//! Keys are canonical allergen names and are matched exactly against the
//! user's allergen names. Values are lowercase substrings searched for in the
//! ingredients transcript.

const PEPPER_RELATED: &[&str] = &[
    "capsicum",
    "capsaicin",
    "paprika",
    "chili",
    "chilli",
    "cayenne",
    "jalapeño",
    "pimento",
    "bell pepper",
    "red pepper",
    "green pepper",
    "capsicum extract",
    "pepper extract",
    "pepper oleoresin",
];

pub static CROSS_REACTIVITY: &[(&str, &[&str])] = &[
    ("Pepper", PEPPER_RELATED),
    ("Peppers", PEPPER_RELATED),
    (
        "Milk",
        &[
            "dairy",
            "lactose",
            "whey",
            "casein",
            "butter",
            "cream",
            "cheese",
            "yogurt",
            "buttermilk",
            "curd",
        ],
    ),
    (
        "Dairy",
        &[
            "milk",
            "lactose",
            "whey",
            "casein",
            "butter",
            "cream",
            "cheese",
            "yogurt",
            "buttermilk",
            "curd",
        ],
    ),
    (
        "Wheat",
        &[
            "gluten", "flour", "bread", "pasta", "bulgur", "semolina", "couscous", "bran", "starch",
        ],
    ),
    (
        "Gluten",
        &[
            "wheat",
            "barley",
            "rye",
            "malt",
            "oats",
            "beer",
            "spelt",
            "triticale",
            "kamut",
        ],
    ),
];

/// Relationships strong enough to turn a resolved verdict unsafe.
///
/// Each entry is `(allergen name fragment, related ingredient fragment)`, both
/// lowercase and matched by containment. Keep this list narrow: every other
/// table hit stays a caution note.
pub static ESCALATIONS: &[(&str, &str)] = &[("pepper", "capsicum")];

pub fn related_ingredients(allergen_name: &str) -> Option<&'static [&'static str]> {
    CROSS_REACTIVITY
        .iter()
        .find(|(name, _)| *name == allergen_name)
        .map(|(_, related)| *related)
}

pub fn escalates(allergen_name: &str, related_ingredient: &str) -> bool {
    let allergen_name = allergen_name.to_lowercase();
    let related_ingredient = related_ingredient.to_lowercase();

    ESCALATIONS.iter().any(|(allergen, ingredient)| {
        allergen_name.contains(*allergen) && related_ingredient.contains(*ingredient)
    })
}
