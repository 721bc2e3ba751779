//! HTTP handlers for the product resource.

use std::sync::Arc;

use http::header::{HeaderValue, LOCATION};
use http::{Method, StatusCode};
use restpack::extract::{
    bad_request, internal_server_error, not_found, write_error_json, write_json, ApiRequest,
    HttpResponse, Validate,
};
use restpack::server::ApiServer;
use restpack::telemetry::log_category;
use serde_json::json;
use tracing::Level;

use crate::store::{ProductStore, StoreError};
use crate::types::{CreateProductPayload, UpdateProductPayload};

const DB_ERROR: &str = "DB Error";

/// Handlers for `/products` and `/products/{id}`.
///
/// Outcomes map to statuses as follows: a malformed id or body is 400
/// `Bad Request`, a payload failing validation is 400 `Validation Error`
/// with per-field details, a missing product is 404 and any store failure
/// is 500.
pub struct ProductHandler {
    store: Arc<dyn ProductStore>,
    base_url: String,
    path_prefix: String,
    mutation_status: StatusCode,
}

impl ProductHandler {
    /// Creates handlers that build `Location` URLs from `base_url` and
    /// `path_prefix`.
    pub fn new(
        store: Arc<dyn ProductStore>,
        base_url: impl Into<String>,
        path_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            path_prefix: path_prefix.into().trim_end_matches('/').to_string(),
            mutation_status: StatusCode::OK,
        }
    }

    /// Status returned by successful updates and deletes (default `200 OK`).
    ///
    /// The body carries a confirmation message, which a `204` response
    /// cannot deliver over HTTP/1.1.
    #[must_use]
    pub fn with_mutation_status(mut self, status: StatusCode) -> Self {
        self.mutation_status = status;
        self
    }

    /// Registers the five product routes on `server`.
    pub fn register(self: Arc<Self>, server: &mut ApiServer) {
        let h = Arc::clone(&self);
        server.register_route(
            "/products",
            move |req| {
                let h = Arc::clone(&h);
                async move { h.list_products(&req).await }
            },
            &[Method::GET],
        );

        let h = Arc::clone(&self);
        server.register_route(
            "/products",
            move |req| {
                let h = Arc::clone(&h);
                async move { h.create_product(&req).await }
            },
            &[Method::POST],
        );

        let h = Arc::clone(&self);
        server.register_route(
            "/products/{id}",
            move |req| {
                let h = Arc::clone(&h);
                async move { h.get_product(&req).await }
            },
            &[Method::GET],
        );

        let h = Arc::clone(&self);
        server.register_route(
            "/products/{id}",
            move |req| {
                let h = Arc::clone(&h);
                async move { h.update_product(&req).await }
            },
            &[Method::PUT],
        );

        let h = self;
        server.register_route(
            "/products/{id}",
            move |req| {
                let h = Arc::clone(&h);
                async move { h.delete_product(&req).await }
            },
            &[Method::DELETE],
        );
    }

    /// `GET /products?pagesize=&pagenumber=`
    pub async fn list_products(&self, req: &ApiRequest) -> HttpResponse {
        let page = req.pagination();
        match self.store.list(page.limit(), page.offset()).await {
            Ok(products) => write_json(StatusCode::OK, &products),
            Err(e) => store_failure(&e),
        }
    }

    /// `GET /products/{id}`
    pub async fn get_product(&self, req: &ApiRequest) -> HttpResponse {
        let Some(id) = product_id(req) else {
            return bad_request("", None);
        };

        match self.store.get(id).await {
            Ok(Some(product)) => write_json(StatusCode::OK, &product),
            Ok(None) => not_found("", None),
            Err(e) => store_failure(&e),
        }
    }

    /// `POST /products`
    pub async fn create_product(&self, req: &ApiRequest) -> HttpResponse {
        let payload: CreateProductPayload = match req.json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "rejected product payload");
                return bad_request("", None);
            }
        };
        if let Err(errors) = payload.validate() {
            return validation_failure(&errors);
        }

        let id = match self.store.create(&payload).await {
            Ok(id) => id,
            Err(e) => return store_failure(&e),
        };

        let url = format!("{}{}/products/{id}", self.base_url, self.path_prefix);
        let mut response = write_json(
            StatusCode::CREATED,
            &json!({
                "message": "Product created successfully",
                "id": id,
                "url": url,
            }),
        );
        match HeaderValue::from_str(&url) {
            Ok(location) => {
                response.headers_mut().insert(LOCATION, location);
            }
            Err(e) => tracing::warn!(url = %url, error = %e, "location header not representable"),
        }
        response
    }

    /// `PUT /products/{id}`
    pub async fn update_product(&self, req: &ApiRequest) -> HttpResponse {
        let Some(id) = product_id(req) else {
            return bad_request("", None);
        };
        let mut payload: UpdateProductPayload = match req.json() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "rejected product payload");
                return bad_request("", None);
            }
        };
        payload.id = id;
        if let Err(errors) = payload.validate() {
            return validation_failure(&errors);
        }

        match self.store.get(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return not_found("", None),
            Err(e) => return store_failure(&e),
        }

        match self.store.update(&payload).await {
            Ok(()) => write_json(
                self.mutation_status,
                &json!({"message": "Product updated successfully"}),
            ),
            Err(e) => store_failure(&e),
        }
    }

    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, req: &ApiRequest) -> HttpResponse {
        let Some(id) = product_id(req) else {
            return bad_request("", None);
        };

        match self.store.get(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return not_found("", None),
            Err(e) => return store_failure(&e),
        }

        match self.store.delete(id).await {
            Ok(()) => write_json(
                self.mutation_status,
                &json!({"message": "Product deleted successfully"}),
            ),
            Err(e) => store_failure(&e),
        }
    }
}

/// Positive integer `{id}` path segment.
fn product_id(req: &ApiRequest) -> Option<i64> {
    req.param_as::<i64>("id").ok().filter(|id| *id > 0)
}

fn validation_failure(errors: &restpack::extract::ValidationErrors) -> HttpResponse {
    write_error_json(
        StatusCode::BAD_REQUEST,
        "Validation Error",
        Some(errors.to_details()),
    )
}

fn store_failure(e: &StoreError) -> HttpResponse {
    log_category(Level::ERROR, DB_ERROR, &e.to_string());
    internal_server_error("", None)
}
