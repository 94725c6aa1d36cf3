use anyhow::Result;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use base64::{prelude::BASE64_STANDARD, Engine};
use clap::Parser;
use muse_core::{Checkpoints, GenerationRequest, ModelLike, PredictError, ScriptModel};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};
use tokio::{self, net::TcpListener};

// Define command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Muse multi-subject image generation server")]
struct Args {
    /// Host address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Interpreter used to launch the inference script
    #[arg(long, default_value = "python")]
    python: PathBuf,

    /// Path to the single-sample inference script
    #[arg(long, default_value = "inference_single_sample.py")]
    script: PathBuf,

    /// Directory holding the model checkpoints
    #[arg(long, default_value = "./checkpoints")]
    checkpoint_dir: PathBuf,
}

#[derive(Serialize)]
struct GenerationResponse {
    /// Where each generated image was written, in request order.
    paths: Vec<PathBuf>,
    /// The same images as base64-encoded PNGs.
    images: Vec<String>,
}

// Application state containing the configured inference backend.
#[derive(Clone)]
struct AppState(Arc<dyn ModelLike>);

async fn generate_images_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerationRequest>,
) -> impl IntoResponse {
    match generate_images(req, &state) {
        Ok(resp) => Json(resp).into_response(),
        Err(e @ PredictError::InvalidInput(_)) => {
            tracing::warn!("rejected generation request: {e}");
            (StatusCode::BAD_REQUEST, format!("Error: {e}")).into_response()
        }
        Err(e) => {
            tracing::error!("error generating images: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {e}")).into_response()
        }
    }
}

/// Runs the full prediction and inlines each produced PNG as base64.
fn generate_images(
    params: GenerationRequest,
    state: &AppState,
) -> Result<GenerationResponse, PredictError> {
    let paths = state.0.run(params)?;
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        images.push(BASE64_STANDARD.encode(std::fs::read(path)?));
    }
    Ok(GenerationResponse { paths, images })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    // Checkpoint locations are published once at startup; the inference
    // script reads them from the environment on every invocation.
    Checkpoints::from_dir(&args.checkpoint_dir).export();

    let model = ScriptModel::new(args.python, args.script);

    // Build application state and wrap in Arc.
    let app_state = AppState(Arc::new(model));
    let shared_state = Arc::new(app_state);

    // --- Build axum router with shared state ---
    let app = Router::new()
        .route("/v1/images/generations", post(generate_images_handler))
        .with_state(shared_state);

    // --- Start the server ---
    let bind_address = format!("{}:{}", args.host, args.port);
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("started server on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_deserializes_with_defaults_omitted() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{
                "images": ["a.jpg", "b.jpg"],
                "captions": "a woman, a girl",
                "idips": "true,false",
                "prompt": "ENT1 and ENT2 in a park"
            }"#,
        )
        .unwrap();
        assert_eq!(req.images.len(), 2);
        assert_eq!(req.seed, None);
        assert_eq!(req.num_images, None);
    }

    #[test]
    fn generation_response_serializes_paths_and_payloads() {
        let resp = GenerationResponse {
            paths: vec![PathBuf::from("/tmp/out/output_0.png")],
            images: vec![BASE64_STANDARD.encode(b"png-bytes")],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["paths"][0], "/tmp/out/output_0.png");
        assert_eq!(json["images"][0], "cG5nLWJ5dGVz");
    }
}
