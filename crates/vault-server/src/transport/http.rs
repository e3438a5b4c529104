//! HTTP transport for textvault

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::error::ApiError;
use vault_core::{InsertRequest, ItemService};

/// Item collection path
pub const ITEMS_PATH: &str = "/v1/text-management";

/// Shared state for HTTP handlers
struct AppState {
    service: Arc<ItemService>,
}

/// Response to a successful insert
#[derive(Debug, Serialize, Deserialize)]
pub struct InsertResponse {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetQuery {
    text_id: Option<String>,
}

/// Credentials sent in the body of a get
#[derive(Debug, Default, Deserialize)]
struct GetCredentials {
    #[serde(default)]
    private_key: String,
    #[serde(default)]
    private_key_password: String,
}

/// Response to a successful get
#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    pub text: String,
}

/// Build the application router
pub fn router(service: Arc<ItemService>) -> Router {
    let state = Arc::new(AppState { service });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route(ITEMS_PATH, get(get_item).post(insert_item))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP transport serving the item routes
pub struct HttpTransport {
    service: Arc<ItemService>,
    addr: SocketAddr,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(service: Arc<ItemService>, addr: SocketAddr) -> Self {
        Self { service, addr }
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.service.clone());

        info!("Starting HTTP server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}

/// Store a new item
async fn insert_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsertRequest>, JsonRejection>,
) -> Result<Json<InsertResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    debug!("Insert request: {:?}", request);

    let inserted = state.service.insert(request).await?;

    Ok(Json(InsertResponse {
        uuid: inserted.id,
        private_key: inserted.private_key,
    }))
}

/// Read an item, decrypting it with the credentials in the body
async fn get_item(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetQuery>,
    body: Bytes,
) -> Result<Json<GetResponse>, ApiError> {
    let text_id = query
        .text_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::NotAcceptable("text_id is required".to_string()))?;

    let credentials: GetCredentials = if body.iter().all(u8::is_ascii_whitespace) {
        GetCredentials::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::NotAcceptable(format!("invalid credentials: {}", e)))?
    };

    let text = state
        .service
        .get(
            &text_id,
            &credentials.private_key,
            &credentials.private_key_password,
        )
        .await?;

    Ok(Json(GetResponse { text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;
    use vault_core::{CryptoEngine, KeyDerivationParams, MemoryRecordStore, UuidGenerator};

    fn test_app() -> Router {
        let engine = CryptoEngine::new(KeyDerivationParams {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
        });
        let service = ItemService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(UuidGenerator),
            engine,
        );
        router(Arc::new(service))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn insert(app: &Router, body: serde_json::Value) -> InsertResponse {
        let response = send(app, "POST", ITEMS_PATH, Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_end_to_end_unencrypted() {
        let app = test_app();

        let response = send(
            &app,
            "POST",
            ITEMS_PATH,
            Some(serde_json::json!({ "text_data": "text data", "encryption": false })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let raw = body_text(response).await;
        assert!(!raw.contains("private_key"));
        let inserted: InsertResponse = serde_json::from_str(&raw).unwrap();

        let uri = format!("{}?text_id={}", ITEMS_PATH, inserted.uuid);
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"text":"text data"}"#);
    }

    #[tokio::test]
    async fn test_end_to_end_encrypted() {
        let app = test_app();

        let response = send(
            &app,
            "POST",
            ITEMS_PATH,
            Some(serde_json::json!({
                "text_data": "encrypted text data",
                "encryption": true,
                "key_size": 1024,
                "private_key_password": "pass-word_42",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let raw = body_text(response).await;

        // Only the id and the armored key come back
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
        let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["private_key", "uuid"]);
        assert!(!raw.contains("pass-word_42"));
        assert!(!raw.contains("encrypted text data"));

        let inserted: InsertResponse = serde_json::from_str(&raw).unwrap();
        let private_key = inserted.private_key.expect("private key returned");

        let uri = format!("{}?text_id={}", ITEMS_PATH, inserted.uuid);
        let response = send(
            &app,
            "GET",
            &uri,
            Some(serde_json::json!({
                "private_key": private_key,
                "private_key_password": "pass-word_42",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"text":"encrypted text data"}"#);

        let response = send(
            &app,
            "GET",
            &uri,
            Some(serde_json::json!({
                "private_key": private_key,
                "private_key_password": "654321",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response)
            .await
            .contains("Cannot read file with given credentials"));
    }

    #[tokio::test]
    async fn test_encrypted_get_without_credentials() {
        let app = test_app();

        let inserted = insert(
            &app,
            serde_json::json!({
                "text_data": "secret",
                "encryption": true,
                "key_size": 1024,
                "private_key_password": "pw",
            }),
        )
        .await;

        let uri = format!("{}?text_id={}", ITEMS_PATH, inserted.uuid);
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_without_text_id() {
        let app = test_app();

        let response = send(
            &app,
            "GET",
            ITEMS_PATH,
            Some(serde_json::json!({ "private_key": "private_key", "private_key_password": "aaa" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_get_with_malformed_credentials() {
        let app = test_app();

        let uri = format!("{}?text_id=154ad8a0-1e42-4cf6-9d7b-e49f71dcc4ec", ITEMS_PATH);
        let response = send(
            &app,
            "GET",
            &uri,
            Some(serde_json::json!({ "private_key": "private_key", "private_key_password": 12 })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_get_unknown_item() {
        let app = test_app();

        let uri = format!("{}?text_id=154ad8a0-1e42-4cf6-9d7b-e49f71dcc4ec", ITEMS_PATH);
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_insert_validation_errors() {
        let app = test_app();

        let cases = [
            serde_json::json!({ "text_data": "text" }),
            serde_json::json!({ "text_data": "", "encryption": false }),
            serde_json::json!({ "text_data": "text", "encryption": true, "key_size": 12, "private_key_password": "pw" }),
            serde_json::json!({ "text_data": "text", "encryption": true, "key_size": 1024 }),
            serde_json::json!({ "text_data": "text", "encryption": "yes" }),
        ];

        for case in cases {
            let response = send(&app, "POST", ITEMS_PATH, Some(case.clone())).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "case {}", case);
            assert!(body_text(response).await.contains("error"));
        }
    }

    #[tokio::test]
    async fn test_insert_payload_too_large() {
        let app = test_app();

        let response = send(
            &app,
            "POST",
            ITEMS_PATH,
            Some(serde_json::json!({
                "text_data": "x".repeat(100),
                "encryption": true,
                "key_size": 1024,
                "private_key_password": "pw",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
