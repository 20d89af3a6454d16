//! Favorites endpoints, and the [`store::FavoritesClient`] implementation
//! the favorites store runs on.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use store::{ClientError, Credential, FavoritesClient, RecipeId};

use crate::client::{require, ApiClient};
use crate::error::ApiError;
use crate::models::{Page, RecipeSummary};
use crate::recipes::DEFAULT_PAGE_SIZE;

#[derive(Deserialize)]
struct FavoriteState {
    #[serde(default)]
    favorite: Option<bool>,
}

fn favorite_flag(body: Value) -> Option<bool> {
    serde_json::from_value::<FavoriteState>(body)
        .ok()
        .and_then(|state| state.favorite)
}

/// Interpret the `/api/favorites/ids` body. Anything but an array of
/// integers counts as "no favorites".
fn parse_favorite_ids(body: Value) -> Vec<RecipeId> {
    match body {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_i64().map(RecipeId),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

impl ApiClient {
    /// Favorited recipes, one page at a time.
    pub async fn list_favorites(
        &self,
        page: u32,
        size: Option<u32>,
        credential: Option<&Credential>,
    ) -> Result<Page<RecipeSummary>, ApiError> {
        let credential = require(credential)?;
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        let request = self
            .request(Method::GET, "/api/favorites", Some(credential))
            .query(&[("page", page), ("size", size)]);
        self.send_json(request).await
    }

    pub async fn get_favorite_ids(&self, credential: &Credential) -> Result<Vec<RecipeId>, ApiError> {
        let request = self.request(Method::GET, "/api/favorites/ids", Some(credential));
        Ok(parse_favorite_ids(self.send_value(request).await?))
    }

    /// Returns the backend's favorite flag after the call; a missing flag
    /// means the add succeeded.
    pub async fn add_favorite(&self, id: RecipeId, credential: &Credential) -> Result<bool, ApiError> {
        let path = format!("/api/recipes/{id}/favorite");
        let body = self
            .send_value(self.request(Method::POST, &path, Some(credential)))
            .await?;
        Ok(favorite_flag(body).unwrap_or(true))
    }

    /// Returns the backend's favorite flag after the call; a missing flag
    /// means the recipe is no longer a favorite.
    pub async fn remove_favorite(
        &self,
        id: RecipeId,
        credential: &Credential,
    ) -> Result<bool, ApiError> {
        let path = format!("/api/recipes/{id}/favorite");
        let body = self
            .send_value(self.request(Method::DELETE, &path, Some(credential)))
            .await?;
        Ok(favorite_flag(body).unwrap_or(false))
    }
}

impl FavoritesClient for ApiClient {
    async fn favorite_ids(&self, credential: &Credential) -> Result<Vec<RecipeId>, ClientError> {
        Ok(self.get_favorite_ids(credential).await?)
    }

    async fn add_favorite(&self, id: RecipeId, credential: &Credential) -> Result<bool, ClientError> {
        Ok(ApiClient::add_favorite(self, id, credential).await?)
    }

    async fn remove_favorite(
        &self,
        id: RecipeId,
        credential: &Credential,
    ) -> Result<bool, ClientError> {
        Ok(ApiClient::remove_favorite(self, id, credential).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_favorite_ids_body() {
        assert_eq!(
            parse_favorite_ids(json!([3, "7", 9])),
            vec![RecipeId(3), RecipeId(7), RecipeId(9)]
        );
        assert!(parse_favorite_ids(json!({"content": [1]})).is_empty());
        assert!(parse_favorite_ids(Value::Null).is_empty());
        assert_eq!(parse_favorite_ids(json!([1, null, "x", 2.5])), vec![RecipeId(1)]);
    }

    #[test]
    fn test_favorite_flag() {
        assert_eq!(favorite_flag(json!({"favorite": true})), Some(true));
        assert_eq!(favorite_flag(json!({"favorite": false})), Some(false));
        assert_eq!(favorite_flag(json!({})), None);
        assert_eq!(favorite_flag(Value::Null), None);
    }
}
