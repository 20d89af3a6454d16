//! Recipe reviews.

use reqwest::Method;
use serde::Serialize;
use store::{Credential, RecipeId};

use crate::client::{require, ApiClient};
use crate::error::ApiError;
use crate::models::Rating;

#[derive(Debug, PartialEq, Serialize)]
struct RatingBody {
    stars: u8,
    comment: Option<String>,
}

impl RatingBody {
    fn new(stars: u8, comment: &str) -> Result<Self, ApiError> {
        if !(1..=5).contains(&stars) {
            return Err(ApiError::InvalidInput(
                "rating must be between 1 and 5 stars".to_string(),
            ));
        }
        let comment = comment.trim();
        Ok(Self {
            stars,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        })
    }
}

impl ApiClient {
    /// All ratings of a recipe. With a credential the user's own rating is
    /// flagged `mine`. A non-array body yields no ratings.
    pub async fn list_ratings(
        &self,
        recipe: RecipeId,
        credential: Option<&Credential>,
    ) -> Result<Vec<Rating>, ApiError> {
        let path = format!("/api/recipes/{recipe}/rating");
        let body = self
            .send_value(self.request(Method::GET, &path, credential))
            .await?;
        if !body.is_array() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Create or replace the user's rating.
    pub async fn rate_recipe(
        &self,
        recipe: RecipeId,
        stars: u8,
        comment: &str,
        credential: Option<&Credential>,
    ) -> Result<(), ApiError> {
        let credential = require(credential)?;
        let body = RatingBody::new(stars, comment)?;
        let path = format!("/api/recipes/{recipe}/rating");
        self.send_empty(self.request(Method::POST, &path, Some(credential)).json(&body))
            .await
    }

    pub async fn delete_rating(
        &self,
        recipe: RecipeId,
        credential: Option<&Credential>,
    ) -> Result<(), ApiError> {
        let credential = require(credential)?;
        let path = format!("/api/recipes/{recipe}/rating");
        self.send_empty(self.request(Method::DELETE, &path, Some(credential)))
            .await
    }
}
