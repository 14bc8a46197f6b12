pub mod api;
pub mod config;
pub mod error;
pub mod storage;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::storage::PuzzleStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: PuzzleStore,
}

/// Build the application router
pub fn app(state: AppState, config: &Config) -> Router {
    let mut router = Router::new().merge(api::router());
    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = PuzzleStore::open(&config.puzzle_dir).await?;
    let state = AppState { store };
    let app = app(state, &config);

    // Start the server
    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::{body::Body, response::Response};
    use tempfile::TempDir;

    /// App backed by a fresh temporary puzzle directory
    pub async fn test_app() -> (Router, TempDir) {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            puzzle_dir: tmp.path().to_path_buf(),
            static_dir: None,
        };
        let store = PuzzleStore::open(&config.puzzle_dir).await.unwrap();
        (app(AppState { store }, &config), tmp)
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::body_text;
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_static_fallback() {
        let puzzles = TempDir::new().unwrap();
        let public = TempDir::new().unwrap();
        std::fs::write(public.path().join("index.html"), "<h1>grid</h1>").unwrap();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            puzzle_dir: puzzles.path().to_path_buf(),
            static_dir: Some(public.path().to_path_buf()),
        };
        let store = PuzzleStore::open(&config.puzzle_dir).await.unwrap();
        let app = app(AppState { store }, &config);

        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>grid</h1>");
    }
}
