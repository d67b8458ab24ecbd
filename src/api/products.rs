use crate::api::fetch;
use crate::domain::error::ApiError;
use crate::domain::{CategoryId, Product, ProductId};
use crate::transport::{ApiRequest, Transport};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductsApi {
    transport: Arc<dyn Transport>,
}

impl ProductsApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn list_all(&self) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = fetch(
            self.transport.as_ref(),
            "list products",
            ApiRequest::get("/getAllProduct"),
        )
        .await?;
        tracing::debug!(count = products.len(), "products listed");
        Ok(products)
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn by_id(&self, id: ProductId) -> Result<Product, ApiError> {
        fetch(
            self.transport.as_ref(),
            "product by id",
            ApiRequest::get(format!("/getProductById/{id}")),
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn by_category(&self, category: CategoryId) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = fetch(
            self.transport.as_ref(),
            "products by category",
            ApiRequest::get("/getAllProductByCategory").param("category", category),
        )
        .await?;
        tracing::debug!(category = %category, count = products.len(), "products by category");
        Ok(products)
    }

    /// Server-side name search. The caller decides what an empty query means.
    ///
    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn search(&self, name: &str) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = fetch(
            self.transport.as_ref(),
            "search products",
            ApiRequest::get("/getAllProductsByName").param("name", name),
        )
        .await?;
        tracing::debug!(query = name, count = products.len(), "products searched");
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{DomainError, TransportError};
    use crate::transport::scripted::{envelope, rejection, ScriptedTransport};
    use serde_json::json;

    fn wire_product(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id, "name": name, "currentPrice": 10000, "originalPrice": 12000,
            "imgUrl": "", "stock": 4, "categoryId": 1, "discount": 17
        })
    }

    #[tokio::test]
    async fn test_search_sends_name_param() {
        let transport = ScriptedTransport::new();
        transport.reply(
            "/getAllProductsByName?name=jam",
            envelope(json!([wire_product(1, "Jam Dinding")])),
        );
        let api = ProductsApi::new(transport.clone());

        let products = api.search("jam").await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Jam Dinding");
        assert_eq!(transport.calls(), vec!["/getAllProductsByName?name=jam"]);
    }

    #[tokio::test]
    async fn test_by_category_and_by_id_paths() {
        let transport = ScriptedTransport::new();
        transport.reply(
            "/getAllProductByCategory?category=3",
            envelope(json!([wire_product(1, "A"), wire_product(2, "B")])),
        );
        transport.reply("/getProductById/2", envelope(wire_product(2, "B")));
        let api = ProductsApi::new(transport.clone());

        assert_eq!(api.by_category(CategoryId(3)).await.unwrap().len(), 2);
        assert_eq!(api.by_id(ProductId(2)).await.unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_rejection_never_yields_products() {
        let transport = ScriptedTransport::new();
        transport.reply("/getAllProduct", rejection("database unavailable"));
        let api = ProductsApi::new(transport);

        let result = api.list_all().await;
        assert_eq!(
            result.unwrap_err(),
            ApiError::Domain(DomainError::Rejected {
                message: "database unavailable".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_error_envelope_on_not_found_keeps_backend_message() {
        let transport = ScriptedTransport::new();
        transport.reply_with_status("/getProductById/9", 404, rejection("Produk tidak ditemukan"));
        let api = ProductsApi::new(transport);

        assert_eq!(
            api.by_id(ProductId(9)).await.unwrap_err(),
            ApiError::Domain(DomainError::Rejected {
                message: "Produk tidak ditemukan".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_non_envelope_error_body_keeps_status_class() {
        let transport = ScriptedTransport::new();
        transport.reply_with_status("/getAllProduct", 503, json!("service unavailable"));
        let api = ProductsApi::new(transport);

        assert_eq!(
            api.list_all().await.unwrap_err(),
            ApiError::Transport(TransportError::ServerFault {
                status: 503,
                path: "/getAllProduct".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.fail(
            "/getAllProduct",
            TransportError::ServerFault {
                status: 500,
                path: "/getAllProduct".to_string(),
            },
        );
        let api = ProductsApi::new(transport);

        let err = api.list_all().await.unwrap_err();
        assert!(err.is_transient());
    }
}
