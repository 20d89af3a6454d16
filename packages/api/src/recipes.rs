//! Recipe browsing and search.

use reqwest::Method;
use store::RecipeId;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Page, RecipeDetails, RecipeSummary};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// How `/api/recipes/search` should match recipes.
#[derive(Clone, Debug, PartialEq)]
pub enum RecipeQuery {
    /// Title search.
    Name(String),
    /// Comma-separated ingredient names.
    Ingredients(String),
    /// Recipes that can be cooked from the user's pantry.
    FromPantry,
}

impl RecipeQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Name(q) => vec![("q", q.trim().to_string())],
            Self::Ingredients(csv) => vec![("ingredients", normalize_ingredients(csv))],
            Self::FromPantry => vec![("inPantryOnly", "true".to_string())],
        }
    }
}

/// Trim each entry of an ingredient CSV and drop the empty ones.
pub fn normalize_ingredients(csv: &str) -> String {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

impl ApiClient {
    /// Recipe listing, best rated first.
    pub async fn fetch_recipes(
        &self,
        page: u32,
        size: Option<u32>,
    ) -> Result<Page<RecipeSummary>, ApiError> {
        let request = self.request(Method::GET, "/api/recipes", None).query(&[
            ("page", page),
            ("size", size.unwrap_or(DEFAULT_PAGE_SIZE)),
        ]);
        self.send_json(request).await
    }

    pub async fn recipe_details(&self, id: RecipeId) -> Result<RecipeDetails, ApiError> {
        let path = format!("/api/recipes/{id}");
        self.send_json(self.request(Method::GET, &path, None)).await
    }

    /// Search recipes. Pantry matching needs the user's credential.
    pub async fn search_recipes(
        &self,
        query: &RecipeQuery,
        page: u32,
        size: Option<u32>,
        credential: Option<&store::Credential>,
    ) -> Result<Page<RecipeSummary>, ApiError> {
        let mut params = query.params();
        params.push(("page", page.to_string()));
        params.push(("size", size.unwrap_or(DEFAULT_PAGE_SIZE).to_string()));
        let request = self
            .request(Method::GET, "/api/recipes/search", credential)
            .query(&params);
        self.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ingredients() {
        assert_eq!(normalize_ingredients(" egg, milk ,,flour , "), "egg,milk,flour");
        assert_eq!(normalize_ingredients(" , "), "");
    }

    #[test]
    fn test_query_params() {
        assert_eq!(
            RecipeQuery::Name(" soup ".into()).params(),
            vec![("q", "soup".to_string())]
        );
        assert_eq!(
            RecipeQuery::Ingredients("egg, ham".into()).params(),
            vec![("ingredients", "egg,ham".to_string())]
        );
        assert_eq!(
            RecipeQuery::FromPantry.params(),
            vec![("inPantryOnly", "true".to_string())]
        );
    }
}
