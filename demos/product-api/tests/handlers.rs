//! Product handlers driven through the in-memory client with a mocked store.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use mockall::mock;
use mockall::predicate::eq;
use product_api::{
    build_server, CreateProductPayload, Product, ProductHandler, ProductStore, StoreError,
    UpdateProductPayload,
};
use restpack::config::AppConfig;
use restpack::server::ApiServer;
use restpack::telemetry::LogCapture;
use restpack_test::TestClient;
use serde_json::json;

mock! {
    Store {}

    #[async_trait]
    impl ProductStore for Store {
        async fn create(&self, product: &CreateProductPayload) -> Result<i64, StoreError>;
        async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;
        async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, StoreError>;
        async fn update(&self, product: &UpdateProductPayload) -> Result<(), StoreError>;
        async fn delete(&self, id: i64) -> Result<(), StoreError>;
    }
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.base_url = "http://example.com".into();
    config
}

fn client(store: MockStore) -> TestClient {
    TestClient::from_server(&build_server(&config(), Arc::new(store), tracing::Dispatch::none()))
}

fn db_error() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

fn product_a() -> Product {
    Product {
        id: 1,
        name: "Sample Product".into(),
        description: "First sample".into(),
        image_url: "img/a.png".into(),
        price: 99.99,
        quantity: 4,
        created_at: "2024-10-01 10:00:00".into(),
    }
}

fn product_b() -> Product {
    Product {
        id: 2,
        name: "Real Product".into(),
        description: "Second sample".into(),
        image_url: "img/b.png".into(),
        price: 100.23,
        quantity: 22,
        created_at: "2024-10-02 11:30:00".into(),
    }
}

fn new_product() -> CreateProductPayload {
    CreateProductPayload {
        name: "Test Product".into(),
        description: "New product for testing".into(),
        image_url: "test/image-url".into(),
        price: 22.45,
        quantity: 20,
    }
}

fn updated_product() -> UpdateProductPayload {
    UpdateProductPayload {
        id: 1,
        name: "Test Update Product".into(),
        description: "Updated product for testing".into(),
        image_url: "test/image-url-updated".into(),
        price: 22.45,
        quantity: 20,
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn lists_with_default_page() {
        let mut store = MockStore::new();
        store
            .expect_list()
            .with(eq(1000), eq(0))
            .times(1)
            .returning(|_, _| Ok(vec![product_a(), product_b()]));

        let response = client(store).get("/api/v1/products").send().await;

        response.assert_status(StatusCode::OK);
        let products: Vec<Product> = response.json().unwrap();
        assert_eq!(products, vec![product_a(), product_b()]);
    }

    #[tokio::test]
    async fn empty_list_is_an_empty_array() {
        let mut store = MockStore::new();
        store.expect_list().returning(|_, _| Ok(Vec::new()));

        client(store)
            .get("/api/v1/products")
            .send()
            .await
            .assert_status(StatusCode::OK)
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn page_size_and_number_become_limit_and_offset() {
        let mut store = MockStore::new();
        store
            .expect_list()
            .with(eq(100), eq(800))
            .times(1)
            .returning(|_, _| Ok(vec![product_b()]));

        let response = client(store)
            .get("/api/v1/products?pagesize=100&pagenumber=9")
            .send()
            .await;

        response.assert_status(StatusCode::OK);
        let products: Vec<Product> = response.json().unwrap();
        assert_eq!(products, vec![product_b()]);
    }

    #[tokio::test]
    async fn store_failure_is_500_and_logged() {
        let mut store = MockStore::new();
        store
            .expect_list()
            .with(eq(100), eq(800))
            .returning(|_, _| Err(db_error()));

        let capture = LogCapture::new();
        let server = build_server(&config(), Arc::new(store), capture.dispatch());
        let client = TestClient::from_server(&server);

        let response = {
            let _guard = tracing::dispatcher::set_default(&capture.dispatch());
            client
                .get("/api/v1/products?pagesize=100&pagenumber=9")
                .send()
                .await
        };

        response
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_json(&json!({"error": "Internal Server Error"}));

        let logged = capture
            .lines()
            .into_iter()
            .find(|l| l["fields"]["category"] == "DB Error")
            .expect("store failure should be logged");
        let line: serde_json::Value =
            serde_json::from_str(logged["fields"]["message"].as_str().unwrap()).unwrap();
        assert_eq!(line["category"], "DB Error");
        assert!(line["message"].as_str().unwrap().contains("database error"));
    }
}

mod get {
    use super::*;

    #[tokio::test]
    async fn returns_product() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .with(eq(1))
            .returning(|_| Ok(Some(product_a())));

        let response = client(store).get("/api/v1/products/1").send().await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<Product>().unwrap(), product_a());
    }

    #[tokio::test]
    async fn missing_product_is_404() {
        let mut store = MockStore::new();
        store.expect_get().with(eq(1)).returning(|_| Ok(None));

        client(store)
            .get("/api/v1/products/1")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_json(&json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Err(db_error()));

        client(store)
            .get("/api/v1/products/1")
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_json(&json!({"error": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let mut store = MockStore::new();
        store.expect_get().never();

        let client = client(store);
        for path in ["/api/v1/products/1AbC", "/api/v1/products/0", "/api/v1/products/-3"] {
            client
                .get(path)
                .send()
                .await
                .assert_status(StatusCode::BAD_REQUEST)
                .assert_json(&json!({"error": "Bad Request"}));
        }
    }
}

mod create {
    use super::*;

    #[tokio::test]
    async fn creates_product_with_location() {
        let mut store = MockStore::new();
        store
            .expect_create()
            .withf(|p| *p == new_product())
            .times(1)
            .returning(|_| Ok(1));

        let response = client(store)
            .post("/api/v1/products")
            .json(&new_product())
            .send()
            .await;

        response
            .assert_status(StatusCode::CREATED)
            .assert_header("location", "http://example.com/api/v1/products/1")
            .assert_json(&json!({
                "id": 1,
                "message": "Product created successfully",
                "url": "http://example.com/api/v1/products/1"
            }));
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let mut store = MockStore::new();
        store.expect_create().returning(|_| Err(db_error()));

        client(store)
            .post("/api/v1/products")
            .json(&new_product())
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_json(&json!({"error": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn missing_body_is_400() {
        let mut store = MockStore::new();
        store.expect_create().never();

        client(store)
            .post("/api/v1/products")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json(&json!({"error": "Bad Request"}));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let mut store = MockStore::new();
        store.expect_create().never();

        client(store)
            .post("/api/v1/products")
            .body("{\"name\": ")
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json(&json!({"error": "Bad Request"}));
    }

    #[tokio::test]
    async fn invalid_payload_lists_fields() {
        let mut store = MockStore::new();
        store.expect_create().never();

        client(store)
            .post("/api/v1/products")
            .json(&CreateProductPayload::default())
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json(&json!({
                "error": "Validation Error",
                "details": {
                    "name": "'name' is required",
                    "price": "'price' is required",
                    "quantity": "'quantity' is required"
                }
            }));
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn updates_existing_product() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .with(eq(1))
            .returning(|_| Ok(Some(product_a())));
        store
            .expect_update()
            .withf(|p| *p == updated_product())
            .times(1)
            .returning(|_| Ok(()));

        client(store)
            .put("/api/v1/products/1")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::OK)
            .assert_json(&json!({"message": "Product updated successfully"}));
    }

    #[tokio::test]
    async fn path_id_overrides_body_id() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .with(eq(7))
            .returning(|_| Ok(Some(product_a())));
        store
            .expect_update()
            .withf(|p| p.id == 7)
            .returning(|_| Ok(()));

        client(store)
            .put("/api/v1/products/7")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_id_is_400() {
        let mut store = MockStore::new();
        store.expect_get().never();
        store.expect_update().never();

        client(store)
            .put("/api/v1/products/Abc")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json(&json!({"error": "Bad Request"}));
    }

    #[tokio::test]
    async fn lookup_failure_is_500() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Err(db_error()));
        store.expect_update().never();

        client(store)
            .put("/api/v1/products/1")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn update_failure_is_500() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(Some(product_a())));
        store.expect_update().returning(|_| Err(db_error()));

        client(store)
            .put("/api/v1/products/1")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
            .assert_json(&json!({"error": "Internal Server Error"}));
    }

    #[tokio::test]
    async fn missing_product_is_404() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_update().never();

        client(store)
            .put("/api/v1/products/1")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_payload_is_400_before_lookup() {
        let mut store = MockStore::new();
        store.expect_get().never();

        let payload = UpdateProductPayload {
            name: String::new(),
            ..updated_product()
        };
        client(store)
            .put("/api/v1/products/1")
            .json(&payload)
            .send()
            .await
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_json(&json!({
                "error": "Validation Error",
                "details": {"name": "'name' is required"}
            }));
    }

    #[tokio::test]
    async fn mutation_status_is_configurable() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(Some(product_a())));
        store.expect_update().returning(|_| Ok(()));

        let handler = ProductHandler::new(Arc::new(store), "http://example.com", "")
            .with_mutation_status(StatusCode::ACCEPTED);
        let mut server = ApiServer::new("127.0.0.1:0", "", tracing::Dispatch::none());
        Arc::new(handler).register(&mut server);

        TestClient::from_server(&server)
            .put("/products/1")
            .json(&updated_product())
            .send()
            .await
            .assert_status(StatusCode::ACCEPTED);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deletes_existing_product() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .with(eq(2))
            .returning(|_| Ok(Some(product_b())));
        store
            .expect_delete()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(()));

        client(store)
            .delete("/api/v1/products/2")
            .send()
            .await
            .assert_status(StatusCode::OK)
            .assert_json(&json!({"message": "Product deleted successfully"}));
    }

    #[tokio::test]
    async fn missing_product_is_404() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_delete().never();

        client(store)
            .delete("/api/v1/products/2")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND)
            .assert_json(&json!({"error": "Not Found"}));
    }

    #[tokio::test]
    async fn delete_failure_is_500() {
        let mut store = MockStore::new();
        store.expect_get().returning(|_| Ok(Some(product_b())));
        store.expect_delete().returning(|_| Err(db_error()));

        client(store)
            .delete("/api/v1/products/2")
            .send()
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}

mod routing {
    use super::*;

    #[tokio::test]
    async fn unprefixed_path_is_404() {
        client(MockStore::new())
            .get("/products")
            .send()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsupported_method_is_405() {
        client(MockStore::new())
            .patch("/api/v1/products/1")
            .send()
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED)
            .assert_header("allow", "GET, PUT, DELETE");
    }
}

mod location {
    use super::*;

    #[tokio::test]
    async fn uses_the_mounted_prefix() {
        let mut store = MockStore::new();
        store.expect_create().returning(|_| Ok(5));

        let mut config = config();
        config.server.path_prefix = "/shop/ ".into();
        let server = build_server(&config, Arc::new(store), tracing::Dispatch::none());

        TestClient::from_server(&server)
            .post("/shop/products")
            .json(&new_product())
            .send()
            .await
            .assert_status(StatusCode::CREATED)
            .assert_header("location", "http://example.com/shop/products/5");
    }
}
