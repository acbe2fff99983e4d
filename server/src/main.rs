mod db;
mod guard;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // Google OAuth is optional: without credentials the exchange endpoint
    // reports unavailable and password login remains the only entry point.
    let google = services::auth::GoogleConfig::from_env();
    if google.is_none() {
        tracing::warn!("Google OAuth not configured — /api/auth/google disabled");
    }

    let state = state::AppState::new(pool, google);

    let app = routes::app(state).expect("router init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "authweb listening");
    axum::serve(listener, app).await.expect("server failed");
}
