pub mod checkpoints;
mod error;
mod script;
mod util;

pub use checkpoints::*;
pub use error::*;
pub use script::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
pub(crate) use util::*;

// Define the request type every backend consumes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Input reference images, one per subject.
    pub images: Vec<PathBuf>,
    /// Comma-separated captions, one per image. The prompt refers to them
    /// through the ENT1, ENT2, ... placeholders.
    pub captions: String,
    /// Comma-separated true/false flags, one per image, selecting whether
    /// identity weights apply to that subject.
    pub idips: String,
    pub prompt: String,
    pub seed: Option<i64>,
    pub target_height: Option<u32>,
    pub target_width: Option<u32>,
    pub weight_id: Option<f64>,
    pub weight_ip: Option<f64>,
    pub latent_lora_scale: Option<f64>,
    pub vae_lora_scale: Option<f64>,
    pub num_images: Option<u8>,
}

pub trait ModelLike: Send + Sync {
    fn run(&self, request: GenerationRequest) -> Result<Vec<PathBuf>, PredictError>;
}
