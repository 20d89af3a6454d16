//! Pantry inventory and the ingredient catalogue used to fill it.

use reqwest::Method;
use serde::Serialize;
use store::Credential;

use crate::client::{require, ApiClient};
use crate::error::ApiError;
use crate::models::{Ingredient, PantryItem};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PantryUpdate {
    ingredient_id: i64,
    amount: f64,
}

/// Parse a user-typed quantity. Accepts `,` as the decimal separator.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl ApiClient {
    pub async fn fetch_pantry(&self, credential: Option<&Credential>) -> Result<Vec<PantryItem>, ApiError> {
        let credential = require(credential)?;
        self.send_json(self.request(Method::GET, "/api/pantry", Some(credential)))
            .await
    }

    /// Set the pantry amount of an ingredient, creating the entry if needed.
    pub async fn update_pantry_item(
        &self,
        ingredient_id: i64,
        amount: f64,
        credential: Option<&Credential>,
    ) -> Result<(), ApiError> {
        let credential = require(credential)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ApiError::InvalidInput(format!("invalid amount: {amount}")));
        }
        let body = PantryUpdate {
            ingredient_id,
            amount,
        };
        self.send_empty(
            self.request(Method::POST, "/api/pantry", Some(credential))
                .json(&body),
        )
        .await
    }

    pub async fn delete_pantry_item(
        &self,
        pantry_item_id: i64,
        credential: Option<&Credential>,
    ) -> Result<(), ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/pantry/{pantry_item_id}");
        self.send_empty(self.request(Method::DELETE, &path, Some(credential)))
            .await
    }

    /// Catalogue lookup. A blank query returns nothing without a request.
    pub async fn search_ingredients(
        &self,
        query: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<Ingredient>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let body = self
            .send_value(
                self.request(Method::GET, "/api/ingredients", credential)
                    .query(&[("query", query)]),
            )
            .await?;
        if !body.is_array() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(body)?)
    }
}

/// Group pantry items by their ingredient category, in first-seen order.
/// Items without a category are grouped under `"Other"`.
pub fn group_by_category(items: &[PantryItem]) -> Vec<(String, Vec<&PantryItem>)> {
    let mut groups: Vec<(String, Vec<&PantryItem>)> = Vec::new();
    for item in items {
        let category = item
            .ingredient_category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("Other");
        match groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, members)) => members.push(item),
            None => groups.push((category.to_string(), vec![item])),
        }
    }
    groups
}
