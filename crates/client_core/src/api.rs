use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Item, ItemId},
    protocol::{health_route, item_route, items_route, CreateItemRequest, ItemPatch},
};
use tracing::debug;
use url::Url;

use crate::{config::ClientSettings, error::ClientError};

/// The REST resource the item store talks to.
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn health(&self) -> Result<(), ClientError>;
    async fn list_items(&self) -> Result<Vec<Item>, ClientError>;
    async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, ClientError>;
    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ClientError>;
    async fn delete_item(&self, id: ItemId) -> Result<(), ClientError>;
}

pub struct HttpItemsApi {
    http: Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpItemsApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::from_settings(&ClientSettings {
            api_url: base_url.to_string(),
            ..ClientSettings::default()
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        Url::parse(&settings.api_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: settings.api_url.clone(),
            source,
        })?;

        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            health_timeout: settings.health_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }
}

async fn expect_success(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn health(&self) -> Result<(), ClientError> {
        let res = self
            .http
            .get(self.endpoint(health_route()))
            .timeout(self.health_timeout)
            .send()
            .await?;
        expect_success(res).await?;
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let res = self.http.get(self.endpoint(items_route())).send().await?;
        let items: Vec<Item> = expect_success(res).await?.json().await?;
        debug!(count = items.len(), "fetched items");
        Ok(items)
    }

    async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, ClientError> {
        let res = self
            .http
            .post(self.endpoint(items_route()))
            .json(request)
            .send()
            .await?;
        Ok(expect_success(res).await?.json().await?)
    }

    async fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<Item, ClientError> {
        let res = self
            .http
            .patch(self.endpoint(&item_route(id)))
            .json(patch)
            .send()
            .await?;
        Ok(expect_success(res).await?.json().await?)
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ClientError> {
        let res = self
            .http
            .delete(self.endpoint(&item_route(id)))
            .send()
            .await?;
        expect_success(res).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
