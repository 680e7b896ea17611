use crate::{
    api,
    catalog::Catalog,
    config::FeedConfig,
    content::{ContentProvider, mock::MockContentProvider},
    session::{SessionManager, SessionSettings},
    ws::ws_handler,
};
use axum::{
    Router,
    http::{HeaderName, Method},
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

pub struct App {
    pub manager: Arc<SessionManager>,
    pub config: FeedConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::new(FeedConfig::default())
    }
}

impl App {
    /// Builds the app around the bundled mock catalog and content provider.
    /// Must be called inside a tokio runtime: it spawns the idle-session sweeper.
    pub fn new(config: FeedConfig) -> Self {
        let provider = Arc::new(MockContentProvider::new(Duration::from_millis(
            config.feed.mock_delay_ms,
        )));
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: FeedConfig, provider: Arc<dyn ContentProvider>) -> Self {
        let manager = Arc::new(SessionManager::new(
            Arc::new(Catalog::mock()),
            provider,
            SessionSettings::from(&config),
        ));

        let manager_clone = manager.clone();
        let idle_timeout = config.session.idle_timeout();
        let cleanup_interval = config.session.cleanup_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(cleanup_interval);

            loop {
                interval.tick().await;
                let removed = manager_clone.cleanup_idle_sessions(idle_timeout).await;
                if removed > 0 {
                    debug!(removed, "Swept idle sessions");
                }
            }
        });

        Self { manager, config }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            // allow the Content-Type header and the headers needed for WebSockets
            .allow_headers([
                HeaderName::from_static("content-type"),
                HeaderName::from_static("upgrade"),
                HeaderName::from_static("connection"),
                HeaderName::from_static("sec-websocket-key"),
                HeaderName::from_static("sec-websocket-version"),
                HeaderName::from_static("sec-websocket-extensions"),
                HeaderName::from_static("sec-websocket-protocol"),
            ])
            .allow_origin(Any);

        Router::new()
            // WebSocket route
            .route("/ws/session/{session_id}", get(ws_handler))
            // Session routes
            .route(
                "/api/sessions",
                get(api::sessions::list_sessions).post(api::sessions::create_session),
            )
            .route(
                "/api/sessions/{session_id}",
                get(api::sessions::get_session).delete(api::sessions::delete_session),
            )
            .route(
                "/api/sessions/{session_id}/commands",
                post(api::sessions::post_command),
            )
            // Catalog routes
            .route("/api/stories", get(api::catalog::list_stories))
            .route("/api/categories", get(api::catalog::list_categories))
            .route("/api/categories/{slug}", get(api::catalog::get_category))
            .route("/api/shorts", get(api::catalog::list_shorts))
            .route("/api/product", get(api::catalog::get_product))
            .layer(cors)
            .with_state(self.manager.clone())
    }

    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Server running on http://{}", listener.local_addr()?);
        match axum::serve(listener, self.router()).await {
            Ok(_) => info!("Server shut down gracefully"),
            Err(e) => error!("Server error: {}", e),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{Value, json};
    use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};
    use tower::ServiceExt;

    fn test_app() -> App {
        App::with_provider(
            FeedConfig::default(),
            Arc::new(MockContentProvider::new(Duration::ZERO)),
        )
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn create(router: &Router) -> String {
        let (status, body) = send(router, Request::post("/api/sessions").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn session_lifecycle_over_http() {
        let app = test_app();
        let router = app.router();
        let id = create(&router).await;

        let (status, listed) = send(&router, get("/api/sessions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([id.clone()]));

        let (status, snapshot) = send(&router, get(&format!("/api/sessions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["cart_count"], 0);
        assert_eq!(snapshot["player"]["state"], "Closed");

        let delete = Request::delete(format!("/api/sessions/{id}")).body(Body::empty()).unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, get(&format!("/api/sessions/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "SessionNotFound");
    }

    #[tokio::test]
    async fn commands_return_the_updated_snapshot() {
        let app = test_app();
        let router = app.router();
        let id = create(&router).await;
        let uri = format!("/api/sessions/{id}/commands");

        let (status, snapshot) = send(&router, post_json(&uri, json!({ "type": "AddToCart" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot["cart_count"], 1);
        assert_eq!(snapshot["snackbar"], "Added to cart");

        let (_, snapshot) = send(&router, post_json(&uri, json!({ "type": "OpenStory", "data": { "index": 2 } }))).await;
        assert_eq!(snapshot["player"]["state"], "Playing");
        assert_eq!(snapshot["player"]["story_index"], 2);
        assert_eq!(snapshot["player"]["item_index"], 0);

        let (status, body) = send(
            &router,
            post_json(&uri, json!({ "type": "AddComment", "data": { "video_id": "x", "text": "  " } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "EmptyComment");
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let app = test_app();
        let router = app.router();
        let uri = format!("/api/sessions/{}/commands", uuid::Uuid::new_v4());

        let (status, body) = send(&router, post_json(&uri, json!({ "type": "AddToCart" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "SessionNotFound");
    }

    #[tokio::test]
    async fn catalog_routes_serve_mock_data() {
        let app = test_app();
        let router = app.router();

        let (status, stories) = send(&router, get("/api/stories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stories.as_array().unwrap().len(), 6);

        let (_, page) = send(&router, get("/api/categories/smartphones")).await;
        assert_eq!(page["influencers"].as_array().unwrap().len(), 3);
        assert!(page["empty_message"].is_null());

        let (status, page) = send(&router, get("/api/categories/smart-watches")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["influencers"], json!([]));
        assert_eq!(page["empty_message"], "No influencers found for this category yet.");

        let (_, product) = send(&router, get("/api/product")).await;
        assert_eq!(product["options"].as_array().unwrap().len(), 2);
    }

    async fn serve(app: &App) -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn websocket_applies_commands_and_streams_events() {
        let app = test_app();
        let addr = serve(&app).await;
        let session_id = app.manager.create_session().await.unwrap().id();

        let (mut socket, _) = connect_async(format!("ws://{addr}/ws/session/{session_id}"))
            .await
            .unwrap();
        let command = json!({ "type": "ToggleLike", "data": { "video_id": "x" } });
        socket
            .send(WsMessage::Text(command.to_string().into()))
            .await
            .unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(frame) = socket.next().await {
                if let WsMessage::Text(text) = frame.unwrap() {
                    let event: Value = serde_json::from_str(&text).unwrap();
                    if event["type"] == "InteractionChanged" {
                        return event;
                    }
                }
            }
            panic!("socket closed before the interaction event");
        })
        .await
        .unwrap();
        assert_eq!(event["data"], json!({ "video_id": "x", "liked": true, "saved": false }));
        assert!(app.manager.snapshot(&session_id).await.is_ok());

        // removing the session drops its event channel and ends the socket
        assert!(app.manager.remove_session(&session_id).await);
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(Ok(frame)) = socket.next().await {
                if frame.is_close() {
                    break;
                }
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn websocket_to_unknown_session_is_rejected_before_upgrade() {
        let app = test_app();
        let addr = serve(&app).await;

        let err = connect_async(format!("ws://{addr}/ws/session/{}", uuid::Uuid::new_v4()))
            .await
            .unwrap_err();
        match err {
            tokio_tungstenite::tungstenite::Error::Http(response) => {
                assert_eq!(response.status(), StatusCode::NOT_FOUND);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
