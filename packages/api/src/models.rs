//! # Wire types for the recipe backend
//!
//! The backend speaks camelCase JSON and is loose about optional fields, so
//! every field that can be missing is `Option` or `#[serde(default)]`.
//!
//! | Struct | Endpoint(s) |
//! |--------|-------------|
//! | [`Page`] | paged listings (`/api/recipes`, `/api/favorites`, search) |
//! | [`RecipeSummary`] | cards in listings |
//! | [`RecipeDetails`], [`IngredientLine`], [`RecipeStep`] | `/api/recipes/{id}` |
//! | [`Rating`], [`RatingSummary`] | `/api/recipes/{id}/rating` |
//! | [`PantryItem`] | `/api/pantry` |
//! | [`Ingredient`] | `/api/ingredients` |
//! | [`ShoppingList`], [`ShoppingListItem`] | `/api/shopping-lists` |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use store::RecipeId;

/// One page of a Spring-style paged listing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// `Some(false)` when more pages follow.
    #[serde(default)]
    pub last: Option<bool>,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.last == Some(false)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    #[serde(default)]
    pub title: Option<String>,
    /// Total time in minutes.
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl RecipeSummary {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled")
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: RecipeId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_time_min: Option<f64>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
}

impl RecipeDetails {
    /// Steps in cooking order.
    pub fn ordered_steps(&self) -> Vec<&RecipeStep> {
        let mut steps: Vec<&RecipeStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.step_no.unwrap_or(0));
        steps
    }
}

/// An ingredient as it appears on a recipe or a shopping list. The backend
/// uses different field names in different places, so both spellings are
/// accepted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_unit: Option<String>,
    /// Number or numeric string (`"1,5"` is accepted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    #[serde(default)]
    pub step_no: Option<u32>,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub time_min: Option<f64>,
}

impl RecipeStep {
    /// Timer length for this step; zero when the step has no time.
    pub fn timer_seconds(&self) -> u64 {
        match self.time_min {
            Some(min) if min.is_finite() && min > 0.0 => (min * 60.0).round() as u64,
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub stars: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Whether the rating belongs to the requesting user.
    #[serde(default)]
    pub mine: bool,
}

/// Aggregate over a recipe's ratings, computed client-side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingSummary {
    pub count: usize,
    pub average: Option<f64>,
    pub mine: Option<Rating>,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let count = ratings.len();
        let sum: f64 = ratings
            .iter()
            .filter_map(|r| r.stars)
            .filter(|s| s.is_finite())
            .sum();
        Self {
            count,
            average: (count > 0).then(|| sum / count as f64),
            mine: ratings.iter().find(|r| r.mine).cloned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: i64,
    #[serde(default)]
    pub ingredient_id: Option<i64>,
    #[serde(default)]
    pub ingredient_name: Option<String>,
    #[serde(default)]
    pub ingredient_unit: Option<String>,
    #[serde(default)]
    pub ingredient_category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<ShoppingListItem>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub ingredient_id: Option<i64>,
    #[serde(default)]
    pub ingredient: Option<NestedIngredient>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingredient_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub ingredient_unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NestedIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Body for creating or updating a shopping list item.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_missing_fields() {
        let page: Page<RecipeSummary> =
            serde_json::from_str(r#"{"content":[{"id":3,"title":"Soup","time":25,"rating":4.5}],"last":false}"#)
                .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, RecipeId(3));
        assert!(page.has_more());

        let empty: Page<RecipeSummary> = serde_json::from_str("{}").unwrap();
        assert!(empty.content.is_empty());
        assert!(!empty.has_more());
    }

    #[test]
    fn test_untitled_recipe() {
        let recipe: RecipeSummary = serde_json::from_str(r#"{"id":1,"title":" "}"#).unwrap();
        assert_eq!(recipe.display_title(), "Untitled");
    }

    #[test]
    fn test_steps_are_ordered_and_timed() {
        let details: RecipeDetails = serde_json::from_str(
            r#"{"id":1,"steps":[
                {"stepNo":2,"instruction":"Boil","timeMin":1.5},
                {"stepNo":1,"instruction":"Chop"}
            ]}"#,
        )
        .unwrap();
        let steps = details.ordered_steps();
        assert_eq!(steps[0].instruction.as_deref(), Some("Chop"));
        assert_eq!(steps[0].timer_seconds(), 0);
        assert_eq!(steps[1].timer_seconds(), 90);
    }

    #[test]
    fn test_rating_summary() {
        let ratings: Vec<Rating> = serde_json::from_str(
            r#"[{"stars":5,"mine":true,"comment":"Great"},{"stars":3},{"comment":"no stars"}]"#,
        )
        .unwrap();
        let summary = RatingSummary::from_ratings(&ratings);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, Some(8.0 / 3.0));
        assert_eq!(summary.mine.unwrap().comment.as_deref(), Some("Great"));

        assert_eq!(RatingSummary::from_ratings(&[]).average, None);
    }
}
