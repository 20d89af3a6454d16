//! # Shopping lists
//!
//! Thin wrappers over `/api/shopping-lists`, plus
//! [`add_recipe_ingredients`](ApiClient::add_recipe_ingredients), which
//! merges a recipe's ingredients into an existing list: an ingredient already
//! on the list (same ingredient id, or same name and unit ignoring case) has
//! its amount increased; anything else is added as a new item.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use store::Credential;

use crate::client::{require, ApiClient};
use crate::error::ApiError;
use crate::models::{IngredientLine, ItemPayload, ShoppingList, ShoppingListItem};

/// Unit used when an ingredient has none ("pieces").
pub const DEFAULT_UNIT: &str = "szt";

#[derive(Serialize)]
struct NameBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// A recipe ingredient reduced to what a shopping list needs.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedIngredient {
    pub ingredient_id: Option<i64>,
    pub name: String,
    pub unit: String,
    pub amount: f64,
}

impl NormalizedIngredient {
    /// `None` for lines without a name.
    pub fn from_line(line: &IngredientLine) -> Option<Self> {
        let name = line
            .ingredient_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(line.name.as_deref())
            .unwrap_or("")
            .trim();
        if name.is_empty() {
            return None;
        }
        let unit = line
            .unit
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .or(line.ingredient_unit.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT);
        let amount = amount_of(line.amount.as_ref())
            .filter(|a| *a > 0.0)
            .unwrap_or(1.0);

        Some(Self {
            ingredient_id: line.ingredient_id,
            name: name.to_string(),
            unit: unit.to_string(),
            amount,
        })
    }

    fn payload(&self) -> ItemPayload {
        ItemPayload {
            ingredient_id: self.ingredient_id,
            name: Some(self.name.clone()),
            unit: Some(self.unit.clone()),
            amount: Some(self.amount),
        }
    }
}

/// Numeric value of an `amount` field that may be a number or a string
/// with `,` as the decimal separator.
fn amount_of(value: Option<&Value>) -> Option<f64> {
    let amount = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    amount.filter(|a| a.is_finite())
}

impl ShoppingListItem {
    fn effective_ingredient_id(&self) -> Option<i64> {
        self.ingredient_id
            .or_else(|| self.ingredient.as_ref().and_then(|i| i.id))
    }

    fn effective_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.ingredient_name.as_deref())
            .or(self.ingredient.as_ref().and_then(|i| i.name.as_deref()))
            .unwrap_or("")
            .trim()
            .to_lowercase()
    }

    fn effective_unit(&self) -> String {
        self.unit
            .as_deref()
            .or(self.ingredient_unit.as_deref())
            .or(self.ingredient.as_ref().and_then(|i| i.unit.as_deref()))
            .unwrap_or("")
            .trim()
            .to_lowercase()
    }

    pub fn amount_value(&self) -> f64 {
        amount_of(self.amount.as_ref()).unwrap_or(0.0)
    }

    fn matches(&self, ingredient: &NormalizedIngredient) -> bool {
        if let (Some(wanted), Some(have)) = (ingredient.ingredient_id, self.effective_ingredient_id()) {
            if wanted == have {
                return true;
            }
        }
        ingredient.name.to_lowercase() == self.effective_name()
            && ingredient.unit.to_lowercase() == self.effective_unit()
    }
}

/// What to do with one ingredient when merging it into a list.
#[derive(Clone, Debug, PartialEq)]
pub enum MergeStep {
    /// Bump an existing item to `amount`.
    Update { item_id: i64, amount: f64 },
    Add(ItemPayload),
}

/// Decide how `ingredient` lands on a list currently holding `items`.
pub fn plan_merge(items: &[ShoppingListItem], ingredient: &NormalizedIngredient) -> MergeStep {
    let existing = items
        .iter()
        .filter(|item| item.id.is_some())
        .find(|item| item.matches(ingredient));
    match existing.and_then(|item| item.id.map(|id| (id, item))) {
        Some((item_id, item)) => MergeStep::Update {
            item_id,
            amount: item.amount_value() + ingredient.amount,
        },
        None => MergeStep::Add(ingredient.payload()),
    }
}

/// Accept either a bare array of lists or a page with `content`.
fn parse_lists(body: Value) -> Result<Vec<ShoppingList>, ApiError> {
    match body {
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        Value::Object(mut map) => match map.remove("content") {
            Some(content @ Value::Array(_)) => Ok(serde_json::from_value(content)?),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

/// The add-item endpoint answers either with the created item or with the
/// whole list; in the latter case the created item is the one with the
/// highest id.
fn created_item(body: Value) -> Result<Option<ShoppingListItem>, ApiError> {
    if let Some(items) = body.get("items").filter(|items| items.is_array()) {
        let items: Vec<ShoppingListItem> = serde_json::from_value(items.clone())?;
        return Ok(items.into_iter().max_by_key(|item| item.id.unwrap_or(-1)));
    }
    if body.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(body)?))
}

impl ApiClient {
    pub async fn list_shopping_lists(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<ShoppingList>, ApiError> {
        let credential = require(credential)?;
        let body = self
            .send_value(self.request(Method::GET, "/api/shopping-lists", Some(credential)))
            .await?;
        parse_lists(body)
    }

    pub async fn get_shopping_list(
        &self,
        list_id: i64,
        credential: Option<&Credential>,
    ) -> Result<ShoppingList, ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/shopping-lists/{list_id}");
        self.send_json(self.request(Method::GET, &path, Some(credential)))
            .await
    }

    /// Create a list; a blank name lets the backend pick one.
    pub async fn create_shopping_list(
        &self,
        name: Option<&str>,
        credential: Option<&Credential>,
    ) -> Result<ShoppingList, ApiError> {
        let credential = require(credential)?;
        let body = NameBody {
            name: name.map(str::trim).filter(|n| !n.is_empty()),
        };
        self.send_json(
            self.request(Method::POST, "/api/shopping-lists", Some(credential))
                .json(&body),
        )
        .await
    }

    pub async fn rename_shopping_list(
        &self,
        list_id: i64,
        name: &str,
        credential: Option<&Credential>,
    ) -> Result<ShoppingList, ApiError> {
        let credential = require(credential)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("list name must not be empty".to_string()));
        }
        let path = format!("/api/shopping-lists/{list_id}");
        self.send_json(
            self.request(Method::PATCH, &path, Some(credential))
                .json(&NameBody { name: Some(name) }),
        )
        .await
    }

    pub async fn add_shopping_list_item(
        &self,
        list_id: i64,
        payload: &ItemPayload,
        credential: Option<&Credential>,
    ) -> Result<Option<ShoppingListItem>, ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/shopping-lists/{list_id}/items");
        let body = self
            .send_value(self.request(Method::POST, &path, Some(credential)).json(payload))
            .await?;
        created_item(body)
    }

    pub async fn update_shopping_list_item(
        &self,
        list_id: i64,
        item_id: i64,
        payload: &ItemPayload,
        credential: Option<&Credential>,
    ) -> Result<ShoppingListItem, ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/shopping-lists/{list_id}/items/{item_id}");
        self.send_json(self.request(Method::PUT, &path, Some(credential)).json(payload))
            .await
    }

    pub async fn delete_shopping_list_item(
        &self,
        list_id: i64,
        item_id: i64,
        credential: Option<&Credential>,
    ) -> Result<(), ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/shopping-lists/{list_id}/items/{item_id}");
        self.send_empty(self.request(Method::DELETE, &path, Some(credential)))
            .await
    }

    /// Close a list, optionally moving its items into the pantry.
    pub async fn finalize_shopping_list(
        &self,
        list_id: i64,
        add_to_pantry: bool,
        credential: Option<&Credential>,
    ) -> Result<Value, ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/shopping-lists/{list_id}/finalize");
        self.send_value(
            self.request(Method::POST, &path, Some(credential))
                .query(&[("addToPantry", add_to_pantry)])
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Merge recipe ingredients into a list and return the resulting items.
    ///
    /// Failures on individual items are logged and skipped so one bad line
    /// does not stop the rest. A list that cannot be loaded is treated as
    /// empty.
    pub async fn add_recipe_ingredients(
        &self,
        list_id: i64,
        ingredients: &[IngredientLine],
        credential: Option<&Credential>,
    ) -> Result<Vec<ShoppingListItem>, ApiError> {
        let credential = require(credential)?;
        if ingredients.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = match self.get_shopping_list(list_id, Some(credential)).await {
            Ok(list) => list.items,
            Err(e) => {
                tracing::warn!(list_id, "Failed to load shopping list before merge: {}", e);
                Vec::new()
            }
        };

        for ingredient in ingredients.iter().filter_map(NormalizedIngredient::from_line) {
            match plan_merge(&items, &ingredient) {
                MergeStep::Update { item_id, amount } => {
                    let payload = ItemPayload {
                        amount: Some(amount),
                        ..ItemPayload::default()
                    };
                    match self
                        .update_shopping_list_item(list_id, item_id, &payload, Some(credential))
                        .await
                    {
                        Ok(updated) => {
                            let updated_id = updated.id.unwrap_or(item_id);
                            for item in items.iter_mut().filter(|i| i.id == Some(updated_id)) {
                                *item = updated.clone();
                            }
                        }
                        Err(e) => {
                            tracing::warn!(list_id, item_id, "Failed to update list item: {}", e)
                        }
                    }
                }
                MergeStep::Add(payload) => {
                    match self
                        .add_shopping_list_item(list_id, &payload, Some(credential))
                        .await
                    {
                        Ok(Some(created)) => items.push(created),
                        Ok(None) => {}
                        Err(e) => tracing::warn!(
                            list_id,
                            name = %ingredient.name,
                            "Failed to add list item: {}",
                            e
                        ),
                    }
                }
            }
        }

        Ok(items)
    }
}
