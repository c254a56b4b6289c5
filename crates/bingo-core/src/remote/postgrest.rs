//! PostgREST Repository
//!
//! `ItemRepository` over Supabase's REST endpoint for the item table.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

use crate::config::BingoConfig;
use crate::domain::{Item, ItemId, ItemPatch, NewItem};
use crate::error::{BingoError, BingoResult};
use crate::repository::{ItemRepository, ListOrder};

/// Error body PostgREST sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

#[derive(Clone)]
pub struct PostgrestRepository {
    http: Client,
    endpoint: String,
    anon_key: String,
}

impl PostgrestRepository {
    pub fn new(config: &BingoConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.rest_endpoint(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.endpoint.as_str())
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send(&self, request: RequestBuilder) -> BingoResult<Response> {
        let response = request.send().await.map_err(BingoError::from)?;
        check_status(response).await
    }
}

/// Query pairs for a full listing
pub fn list_query(order: ListOrder) -> Vec<(&'static str, &'static str)> {
    match order {
        ListOrder::Unordered => vec![("select", "*")],
        ListOrder::IdAscending => vec![("select", "*"), ("order", "id.asc")],
    }
}

/// Row filter matching one id
pub fn id_filter(id: &ItemId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{}", id))]
}

async fn check_status(response: Response) -> BingoResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BingoError::Remote {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Best-effort human message out of an error body
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(err) => {
            let mut message = err.message;
            if let Some(code) = err.code {
                message = format!("{} [{}]", message, code);
            }
            if let Some(hint) = err.hint {
                message = format!("{} (hint: {})", message, hint);
            }
            message
        }
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait(?Send)]
impl ItemRepository for PostgrestRepository {
    async fn list(&self, order: ListOrder) -> BingoResult<Vec<Item>> {
        let request = self.request(Method::GET).query(&list_query(order));
        let response = self.send(request).await?;
        response.json::<Vec<Item>>().await.map_err(BingoError::from)
    }

    async fn insert(&self, item: &NewItem) -> BingoResult<()> {
        let request = self
            .request(Method::POST)
            .header("Prefer", "return=minimal")
            .json(item);
        self.send(request).await?;
        Ok(())
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> BingoResult<()> {
        let request = self
            .request(Method::PATCH)
            .query(&id_filter(id))
            .header("Prefer", "return=minimal")
            .json(patch);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let repo = PostgrestRepository::new(&BingoConfig::new("https://abc.supabase.co", "anon"));
        assert_eq!(repo.endpoint(), "https://abc.supabase.co/rest/v1/bingo_items");
    }

    #[test]
    fn test_queries() {
        assert_eq!(list_query(ListOrder::Unordered), vec![("select", "*")]);
        assert_eq!(list_query(ListOrder::IdAscending)[1], ("order", "id.asc"));
        assert_eq!(id_filter(&"42".into())[0].1, "eq.42");
    }

    #[test]
    fn test_error_message_from_body() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table bingo_items"}"#;
        assert_eq!(error_message(body), "permission denied for table bingo_items [42501]");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
