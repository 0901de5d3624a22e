//! REST API endpoints for the trace server.
//!
//! This module provides the HTTP layer built on [axum](https://docs.rs/axum).
//! Every endpoint is a pure function of its request body: there is no shared
//! state, so the router needs none.
//!
//! # API Endpoints
//!
//! - `POST /api/avl-tree` - Trace AVL insertion of `{"keys": [...]}`
//! - `POST /api/dijkstra` - Trace Dijkstra over `{"graph", "startNode", "directed"}`
//! - `GET /api/algorithms` - List the available algorithms
//! - `GET /api/health` - Liveness probe
//!
//! Engine errors and malformed bodies are returned as `400 Bad Request` with
//! a JSON body of the form `{"error": "<message>"}` (see [`crate::Error`]).
//!
//! # Examples
//!
//! ```bash
//! curl -X POST http://localhost:5000/api/dijkstra \
//!   -H "Content-Type: application/json" \
//!   -d '{"graph": {"A": {"B": 1}, "B": {}}, "startNode": "A"}'
//! ```

use crate::error::{Error, Result};
use algoviz_core::{avl, dijkstra, AvlTrace, DijkstraTrace, Graph, RawAdjacency};

use axum::extract::rejection::JsonRejection;
use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

/// An entry of the `GET /api/algorithms` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Algorithms this server can trace.
pub const ALGORITHMS: &[AlgorithmInfo] = &[
    AlgorithmInfo {
        id: "dijkstra",
        name: "Dijkstra's Algorithm",
    },
    AlgorithmInfo {
        id: "avl",
        name: "AVL Tree",
    },
];

/// The request body for `POST /api/avl-tree`.
///
/// ```json
/// { "keys": [30, 20, "10"] }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct AvlRequest {
    /// Values intended as integer keys, in insertion order.
    #[serde(default)]
    pub keys: Option<Vec<serde_json::Value>>,
}

/// The request body for `POST /api/dijkstra`.
///
/// ```json
/// {
///   "graph": { "A": { "B": 1, "C": 4 }, "B": { "C": 2 }, "C": {} },
///   "startNode": "A",
///   "directed": true
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraRequest {
    /// Adjacency mapping `node -> {neighbor -> weight}`.
    #[serde(default)]
    pub graph: Option<RawAdjacency>,

    /// Node the distances are measured from.
    #[serde(default)]
    pub start_node: Option<String>,

    /// When `false`, every edge is mirrored before the run. Defaults to `true`.
    #[serde(default = "default_directed")]
    pub directed: bool,
}

fn default_directed() -> bool {
    true
}

/// Runs the AVL engine for a request, outside of HTTP.
pub fn run_avl(req: AvlRequest) -> algoviz_core::Result<AvlTrace> {
    let keys = req.keys.unwrap_or_default();
    avl::insert_key_sequence(&keys)
}

/// Runs the Dijkstra engine for a request, outside of HTTP.
///
/// Missing or empty graph and missing start node are rejected before the
/// graph is normalized; an unknown start node is rejected by the engine.
pub fn run_dijkstra(req: DijkstraRequest) -> algoviz_core::Result<DijkstraTrace> {
    let raw = req
        .graph
        .ok_or_else(|| algoviz_core::Error::invalid("Graph is required"))?;
    if raw.is_empty() {
        return Err(algoviz_core::Error::invalid("Graph cannot be empty"));
    }
    let start = req
        .start_node
        .filter(|s| !s.is_empty())
        .ok_or_else(|| algoviz_core::Error::invalid("Start node is required"))?;

    let graph = Graph::from_adjacency(raw, req.directed)?;
    dijkstra::trace(&graph, &start)
}

/// Constructs the main Axum [`Router`] for the trace server.
///
/// # Endpoints Created
///
/// - `POST /api/avl-tree` - AVL insertion trace
/// - `POST /api/dijkstra` - Dijkstra trace
/// - `GET /api/algorithms` - Algorithm listing
/// - `GET /api/health` - Health check
///
/// # Examples
///
/// ```rust,ignore
/// use algoviz::api::create_router;
///
/// let router = create_router();
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, router).await?;
/// ```
pub fn create_router() -> Router {
    Router::new()
        .route("/api/avl-tree", post(avl_tree))
        .route("/api/dijkstra", post(run_dijkstra_handler))
        .route("/api/algorithms", get(list_algorithms))
        .route("/api/health", get(health))
}

/// Runs a CPU-bound engine call off the async worker threads.
async fn compute<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> algoviz_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| Error::Server(format!("Engine task failed: {}", e)))?;
    Ok(outcome?)
}

/// API handler for `POST /api/avl-tree`.
async fn avl_tree(payload: std::result::Result<Json<AvlRequest>, JsonRejection>) -> Result<Json<AvlTrace>> {
    let Json(req) = payload?;
    compute(move || run_avl(req)).await.map(Json)
}

/// API handler for `POST /api/dijkstra`.
async fn run_dijkstra_handler(
    payload: std::result::Result<Json<DijkstraRequest>, JsonRejection>,
) -> Result<Json<DijkstraTrace>> {
    let Json(req) = payload?;
    compute(move || run_dijkstra(req)).await.map(Json)
}

/// API handler for `GET /api/algorithms`.
async fn list_algorithms() -> Json<&'static [AlgorithmInfo]> {
    Json(ALGORITHMS)
}

/// API handler for `GET /api/health`.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_avl_endpoint() {
        let (status, body) = post_json("/api/avl-tree", json!({"keys": [30, 20, 10]})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["finalTree"]["key"], 20);
        assert_eq!(body["steps"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_avl_endpoint_empty_keys() {
        let (status, body) = post_json("/api/avl-tree", json!({"keys": []})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Keys list cannot be empty");
    }

    #[tokio::test]
    async fn test_avl_endpoint_missing_keys() {
        let (status, body) = post_json("/api/avl-tree", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Keys list cannot be empty");
    }

    #[tokio::test]
    async fn test_avl_endpoint_bad_key() {
        let (status, body) = post_json("/api/avl-tree", json!({"keys": [1, "two"]})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid key: two. All keys must be integers.");
    }

    #[tokio::test]
    async fn test_dijkstra_endpoint() {
        let (status, body) = post_json(
            "/api/dijkstra",
            json!({
                "graph": {"A": {"B": 1, "C": 4}, "B": {"C": 2, "D": 5}, "C": {"D": 1}, "D": {}},
                "startNode": "A"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["distances"], json!({"A": 0, "B": 1, "C": 3, "D": 4}));
        assert!(!body["steps"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dijkstra_endpoint_errors() {
        let cases = vec![
            (json!({"startNode": "A"}), "Graph is required"),
            (json!({"graph": {}, "startNode": "A"}), "Graph cannot be empty"),
            (json!({"graph": {"A": {}}}), "Start node is required"),
            (json!({"graph": {"A": {}}, "startNode": "B"}), "Start node B not found in graph"),
        ];

        for (request, expected) in cases {
            let (status, body) = post_json("/api/dijkstra", request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], expected);
        }
    }

    #[tokio::test]
    async fn test_wrong_body_shape_is_json_400() {
        let cases = vec![
            ("/api/avl-tree", json!({"keys": "abc"})),
            ("/api/dijkstra", json!({"graph": {"A": []}, "startNode": "A"})),
            ("/api/dijkstra", json!({"graph": {"A": {}}, "startNode": 7})),
        ];

        for (uri, request) in cases {
            let (status, body) = post_json(uri, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(body["error"].is_string(), "{}: {}", uri, body);
        }
    }

    #[tokio::test]
    async fn test_dijkstra_endpoint_undirected() {
        let (status, body) = post_json(
            "/api/dijkstra",
            json!({"graph": {"A": {"B": 5}}, "startNode": "B", "directed": false}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["distances"], json!({"A": 5, "B": 0}));
    }

    #[tokio::test]
    async fn test_list_algorithms() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/algorithms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!([
                {"id": "dijkstra", "name": "Dijkstra's Algorithm"},
                {"id": "avl", "name": "AVL Tree"}
            ])
        );
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_run_dijkstra_defaults_to_directed() {
        let req: DijkstraRequest =
            serde_json::from_value(json!({"graph": {"A": {"B": 2}}, "startNode": "B"})).unwrap();
        assert!(req.directed);

        let trace = run_dijkstra(req).unwrap();
        assert_eq!(trace.distances["A"], algoviz_core::Distance::Infinite);
    }
}
