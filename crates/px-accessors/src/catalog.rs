//! Catalog accessor: product lookup by big id.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AccessorConfig;
use crate::context::AccessorContext;
use crate::error::AccessorError;
use crate::http::ServiceClient;

pub const SERVICE: &str = "CatalogService";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub product_id: String,
    #[serde(default)]
    pub product_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    #[serde(default)]
    pub products: Vec<CatalogProduct>,
}

#[async_trait]
pub trait CatalogAccessor: Send + Sync {
    async fn get_products(
        &self,
        ctx: &AccessorContext,
        big_ids: &[String],
        market: &str,
        language: &str,
    ) -> Result<CatalogResponse, AccessorError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogAccessor {
    client: ServiceClient,
}

impl HttpCatalogAccessor {
    pub fn new(config: AccessorConfig) -> Result<Self, AccessorError> {
        Ok(Self {
            client: ServiceClient::new(SERVICE, config)?,
        })
    }
}

#[async_trait]
impl CatalogAccessor for HttpCatalogAccessor {
    async fn get_products(
        &self,
        ctx: &AccessorContext,
        big_ids: &[String],
        market: &str,
        language: &str,
    ) -> Result<CatalogResponse, AccessorError> {
        let query = [
            ("bigIds", big_ids.join(",")),
            ("market", market.to_string()),
            ("languages", language.to_string()),
        ];
        self.client
            .get_json(ctx, "v8.0/products", &query, "GetProducts")
            .await
    }
}
