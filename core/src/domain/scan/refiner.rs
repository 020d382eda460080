//! Turns a model analysis into the verdict shown to the user.
//!
//! A scan ends in one of two states. It is `Unclear` when the model's output
//! suggests it could not read the label, and the caller is asked to retake
//! the photo. Otherwise it is `Resolved`: the findings are cross-checked
//! against the cross-reactivity table and the verdict may be strengthened.

use std::fmt;

use tracing::{debug, info};

use crate::domain::{
    allergen::{
        Allergen,
        cross_reactivity::{escalates, related_ingredients},
    },
    scan::{
        entities::{DetectedAllergen, ScanAnalysis, ScanResponse, Severity},
        reply::INGREDIENTS_NOT_EXTRACTED,
    },
};

pub const UNCLEAR_INGREDIENTS: &str = "Could not clearly identify all ingredients. Please take a clearer picture of the ingredients list.";
pub const UNCLEAR_RECOMMENDATION: &str = "Please retake a clearer photo of the ingredients list. For best results, ensure good lighting and focus directly on the text.";
pub const UNCLEAR_ALTERNATIVE: &str =
    "Try holding the camera closer to the ingredients list and ensure good lighting.";

/// Transcripts shorter than this cannot be a real ingredients list.
pub const MIN_INGREDIENTS_CHARS: usize = 15;

/// A "safe, nothing found" verdict needs at least this much transcript.
pub const MIN_SAFE_INGREDIENTS_CHARS: usize = 50;

const RELATED_MARKER: &str = " (may be related to ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanField {
    ProductName,
    Ingredients,
    Recommendation,
}

impl ScanField {
    fn read(self, analysis: &ScanAnalysis) -> &str {
        match self {
            ScanField::ProductName => &analysis.product_name,
            ScanField::Ingredients => &analysis.ingredients,
            ScanField::Recommendation => &analysis.recommendation,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScanField::ProductName => "productName",
            ScanField::Ingredients => "ingredients",
            ScanField::Recommendation => "recommendation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnclearCheck {
    /// Case-insensitive substring; patterns are lowercase.
    Contains(ScanField, &'static str),
    /// Exact match against the trimmed field.
    Equals(ScanField, &'static str),
    /// Trimmed field has fewer characters than the bound.
    ShorterThan(ScanField, usize),
    /// Claims safe with no findings on a transcript shorter than the bound.
    SafeWithoutFindingsShorterThan(usize),
}

impl UnclearCheck {
    fn matches(&self, analysis: &ScanAnalysis) -> bool {
        match *self {
            UnclearCheck::Contains(field, pattern) => {
                field.read(analysis).to_lowercase().contains(pattern)
            }
            UnclearCheck::Equals(field, value) => field.read(analysis).trim() == value,
            UnclearCheck::ShorterThan(field, bound) => char_len(field.read(analysis)) < bound,
            UnclearCheck::SafeWithoutFindingsShorterThan(bound) => {
                analysis.is_safe
                    && analysis.detected_allergens.is_empty()
                    && char_len(&analysis.ingredients) < bound
            }
        }
    }
}

impl fmt::Display for UnclearCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnclearCheck::Contains(field, pattern) => {
                write!(f, "{} contains '{}'", field.as_str(), pattern)
            }
            UnclearCheck::Equals(field, value) => write!(f, "{} is '{}'", field.as_str(), value),
            UnclearCheck::ShorterThan(field, bound) => {
                write!(f, "{} shorter than {} chars", field.as_str(), bound)
            }
            UnclearCheck::SafeWithoutFindingsShorterThan(bound) => {
                write!(f, "safe with no findings on fewer than {} chars", bound)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnclearReason {
    NothingExtracted,
    TranscriptTooShort,
    ModelReportedDifficulty,
    ModelAskedForRetake,
    ProductUnknown,
    UntrustedSafeVerdict,
}

impl UnclearReason {
    pub fn as_str(&self) -> &str {
        match self {
            UnclearReason::NothingExtracted => "ingredients could not be extracted",
            UnclearReason::TranscriptTooShort => "ingredients transcript too short",
            UnclearReason::ModelReportedDifficulty => "model reported difficulty reading the label",
            UnclearReason::ModelAskedForRetake => "model asked for a better photo",
            UnclearReason::ProductUnknown => "product could not be identified",
            UnclearReason::UntrustedSafeVerdict => "safe verdict from an implausibly short transcript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclearRule {
    pub check: UnclearCheck,
    pub reason: UnclearReason,
}

const fn rule(check: UnclearCheck, reason: UnclearReason) -> UnclearRule {
    UnclearRule { check, reason }
}

const fn ingredients_marker(pattern: &'static str) -> UnclearRule {
    rule(
        UnclearCheck::Contains(ScanField::Ingredients, pattern),
        UnclearReason::ModelReportedDifficulty,
    )
}

const fn recommendation_marker(pattern: &'static str) -> UnclearRule {
    rule(
        UnclearCheck::Contains(ScanField::Recommendation, pattern),
        UnclearReason::ModelAskedForRetake,
    )
}

/// Every way a scan can be judged unclear, evaluated in order.
pub static UNCLEAR_RULES: &[UnclearRule] = &[
    rule(
        UnclearCheck::Equals(ScanField::Ingredients, INGREDIENTS_NOT_EXTRACTED),
        UnclearReason::NothingExtracted,
    ),
    rule(
        UnclearCheck::ShorterThan(ScanField::Ingredients, MIN_INGREDIENTS_CHARS),
        UnclearReason::TranscriptTooShort,
    ),
    ingredients_marker("cannot"),
    ingredients_marker("unclear"),
    ingredients_marker("not visible"),
    ingredients_marker("poor quality"),
    ingredients_marker("poor image"),
    ingredients_marker("incomplete"),
    ingredients_marker("partial list"),
    ingredients_marker("illegible"),
    ingredients_marker("blurry"),
    ingredients_marker("can't see"),
    ingredients_marker("can't read"),
    ingredients_marker("unable to read"),
    ingredients_marker("not able to"),
    recommendation_marker("retake"),
    recommendation_marker("clearer"),
    recommendation_marker("better photo"),
    recommendation_marker("better picture"),
    recommendation_marker("better image"),
    recommendation_marker("unclear"),
    recommendation_marker("not visible"),
    recommendation_marker("poor quality"),
    recommendation_marker("blurry"),
    recommendation_marker("illegible"),
    recommendation_marker("can't read"),
    recommendation_marker("unable to read"),
    rule(
        UnclearCheck::Contains(ScanField::ProductName, "unknown"),
        UnclearReason::ProductUnknown,
    ),
    rule(
        UnclearCheck::SafeWithoutFindingsShorterThan(MIN_SAFE_INGREDIENTS_CHARS),
        UnclearReason::UntrustedSafeVerdict,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clarity {
    Resolved,
    Unclear(&'static UnclearRule),
}

pub fn assess_clarity(analysis: &ScanAnalysis) -> Clarity {
    UNCLEAR_RULES
        .iter()
        .find(|rule| rule.check.matches(analysis))
        .map_or(Clarity::Resolved, Clarity::Unclear)
}

/// Produces the final response for one scan. Never fails.
///
/// Refining a response that was itself produced here (converted back with
/// `ScanAnalysis::from`) returns it unchanged.
pub fn refine(analysis: ScanAnalysis, allergens: &[Allergen]) -> ScanResponse {
    match assess_clarity(&analysis) {
        Clarity::Unclear(rule) => {
            info!(
                reason = rule.reason.as_str(),
                check = %rule.check,
                "scan is unclear, asking for a retake"
            );
            unclear_response(analysis.product_name)
        }
        Clarity::Resolved => resolve(analysis, allergens),
    }
}

fn unclear_response(product_name: String) -> ScanResponse {
    ScanResponse {
        product_name,
        is_safe: None,
        detected_allergens: Vec::new(),
        ingredients: UNCLEAR_INGREDIENTS.to_string(),
        recommendation: UNCLEAR_RECOMMENDATION.to_string(),
        alternative_suggestion: UNCLEAR_ALTERNATIVE.to_string(),
    }
}

fn resolve(analysis: ScanAnalysis, allergens: &[Allergen]) -> ScanResponse {
    let ScanAnalysis {
        product_name,
        mut is_safe,
        mut detected_allergens,
        ingredients,
        recommendation,
        alternative_suggestion,
    } = analysis;

    let transcript = ingredients.to_lowercase();
    let first_added = detected_allergens.len();

    for allergen in allergens {
        let Some(related) = related_ingredients(&allergen.name) else {
            continue;
        };

        for ingredient in related {
            if !transcript.contains(ingredient) {
                continue;
            }
            if is_covered(&detected_allergens, &allergen.name, ingredient) {
                continue;
            }

            debug!(
                allergen = %allergen.name,
                ingredient,
                "related ingredient found in transcript"
            );
            detected_allergens.push(DetectedAllergen {
                name: allergen.name.clone(),
                found: format!("{}{}{})", ingredient, RELATED_MARKER, allergen.name),
                severity: Severity::Caution,
            });

            if escalates(&allergen.name, ingredient) {
                info!(allergen = %allergen.name, ingredient, "escalating verdict to unsafe");
                is_safe = false;
            }
        }
    }

    let recommendation = match caution_names(&detected_allergens[first_added..]) {
        Some(names) => format!(
            "This product may contain ingredients related to your allergens ({}). \
             While these might not be direct matches, we recommend caution. {}",
            names, recommendation
        )
        .trim_end()
        .to_string(),
        None => recommendation,
    };

    ScanResponse {
        product_name,
        is_safe: Some(is_safe),
        detected_allergens,
        ingredients,
        recommendation,
        alternative_suggestion,
    }
}

/// A related ingredient is already covered when an existing finding quotes
/// it, or when a finding for the same allergen quoted a shorter term it
/// contains ("capsicum" covers "capsicum extract"). Only the quoted term
/// counts, never the relation note naming another allergen.
fn is_covered(findings: &[DetectedAllergen], allergen_name: &str, ingredient: &str) -> bool {
    findings.iter().any(|finding| {
        let found = finding.found.to_lowercase();
        let term = matched_term(&found);
        if term.contains(ingredient) {
            return true;
        }

        finding.name.eq_ignore_ascii_case(allergen_name)
            && !term.is_empty()
            && ingredient.contains(term)
    })
}

/// The ingredient a finding quotes, without the relation note this module appends.
fn matched_term(found: &str) -> &str {
    found
        .split_once(RELATED_MARKER)
        .map_or(found, |(term, _)| term)
        .trim()
}

fn caution_names(added: &[DetectedAllergen]) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    for finding in added {
        if !names.contains(&finding.name.as_str()) {
            names.push(&finding.name);
        }
    }

    (!names.is_empty()).then(|| names.join(", "))
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}
