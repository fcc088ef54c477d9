use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use huddle_http::{
    oauth::{LinkedInAuth, OAuthConfig},
    ClientOptions,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Callback {
    code: String,
}

async fn linkedin_callback(
    State(auth): State<LinkedInAuth>,
    Json(callback): Json<Callback>,
) -> impl IntoResponse {
    match auth.exchange_code(&callback.code).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(failure) => (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = OAuthConfig::from_env().map_err(anyhow::Error::msg)?;
    let auth = LinkedInAuth::new(config, ClientOptions::default())?;

    let app = Router::new()
        .route("/auth/linkedin/callback", post(linkedin_callback))
        .with_state(auth);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
