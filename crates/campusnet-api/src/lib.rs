//! CampusNet API server
//!
//! Axum REST surface over the campus social graph.

pub mod config;
pub mod envelope;
pub mod routes;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use config::ServerConfig;
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Students
        .route("/student", post(routes::students::create_student))
        .route(
            "/student/{student_id}",
            get(routes::students::get_student).delete(routes::students::delete_student),
        )
        .route(
            "/student/{student_id}/following",
            get(routes::students::following),
        )
        .route(
            "/student/{student_id}/followers",
            get(routes::students::followers),
        )
        .route(
            "/student/{student_id}/suggested_friends",
            get(routes::students::suggested_friends),
        )
        .route(
            "/student/{student_id}/common_interests",
            get(routes::students::common_interests),
        )
        .route("/student/{student_id}/posts", get(routes::students::posts))
        // Courses and clubs
        .route("/course", post(routes::courses::create_course))
        .route("/course/{code}/students", get(routes::courses::students))
        .route("/popular_courses", get(routes::courses::popular))
        .route("/club", post(routes::clubs::create_club))
        .route("/club/{name}/members", get(routes::clubs::members))
        // Relationships
        .route("/relation/follow", post(routes::relations::follow))
        .route("/relation/enroll", post(routes::relations::enroll))
        .route("/relation/join_club", post(routes::relations::join_club))
        // Posts
        .route("/post", post(routes::posts::create_post))
        .route("/post/{post_id}", delete(routes::posts::delete_post))
        // Schema
        .route("/schema", get(routes::schema::summary))
        .route("/schema/visual", get(routes::schema::visual))
        .method_not_allowed_fallback(routes::health::method_not_allowed);

    Router::new()
        .route("/", get(routes::health::index))
        .route("/health", get(routes::health::health))
        .nest("/api", api_routes)
        .fallback(routes::health::not_found)
        .method_not_allowed_fallback(routes::health::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run_server(state: AppState, server: &ServerConfig) -> std::io::Result<()> {
    let app = create_router(state);
    let addr = server.addr();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
