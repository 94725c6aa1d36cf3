use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{error, info};

use crate::{split_list, GenerationRequest, ModelLike, PredictError};

/// Upper bound on images produced by a single prediction call.
pub const MAX_IMAGES: u8 = 4;

/// Backend that drives an external multi-subject inference script, one
/// synchronous invocation per generated image.
pub struct ScriptModel {
    python: PathBuf,
    script: PathBuf,
}

impl ScriptModel {
    pub fn new(python: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            script: script.into(),
        }
    }
}

/// One fully-resolved invocation of the inference script. The per-image
/// lists are passed whole to every invocation; only the seed and save path
/// vary across the loop.
struct Invocation<'a> {
    prompt: &'a str,
    target_height: u32,
    target_width: u32,
    weight_id: f64,
    weight_ip: f64,
    latent_lora_scale: f64,
    vae_lora_scale: f64,
    images: &'a [PathBuf],
    captions: &'a [String],
    idips: &'a [String],
}

impl Invocation<'_> {
    fn args(&self, seed: i64, save_path: &Path) -> Vec<String> {
        let mut args = vec![
            "--prompt".to_string(),
            self.prompt.to_string(),
            "--seed".to_string(),
            seed.to_string(),
            "--target_height".to_string(),
            self.target_height.to_string(),
            "--target_width".to_string(),
            self.target_width.to_string(),
            "--weight_id".to_string(),
            self.weight_id.to_string(),
            "--weight_ip".to_string(),
            self.weight_ip.to_string(),
            "--latent_lora_scale".to_string(),
            self.latent_lora_scale.to_string(),
            "--vae_lora_scale".to_string(),
            self.vae_lora_scale.to_string(),
        ];
        args.push("--images".to_string());
        args.extend(self.images.iter().map(|p| p.to_string_lossy().into_owned()));
        args.push("--captions".to_string());
        args.extend(self.captions.iter().cloned());
        args.push("--idips".to_string());
        args.extend(self.idips.iter().cloned());
        args.push("--save_path".to_string());
        args.push(save_path.to_string_lossy().into_owned());
        // The script renders exactly one image per call; the adapter owns
        // the outer loop.
        args.push("--num_images".to_string());
        args.push("1".to_string());
        args
    }
}

impl ModelLike for ScriptModel {
    fn run(&self, request: GenerationRequest) -> Result<Vec<PathBuf>, PredictError> {
        // Set defaults.
        let seed = request.seed.unwrap_or(42);
        let target_height = request.target_height.unwrap_or(768);
        let target_width = request.target_width.unwrap_or(768);
        let weight_id = request.weight_id.unwrap_or(2.0);
        let weight_ip = request.weight_ip.unwrap_or(5.0);
        let latent_lora_scale = request.latent_lora_scale.unwrap_or(0.85);
        let vae_lora_scale = request.vae_lora_scale.unwrap_or(1.3);
        let num_images = request.num_images.unwrap_or(1);

        if num_images < 1 || num_images > MAX_IMAGES {
            return Err(PredictError::InvalidInput(format!(
                "num_images must be between 1 and {MAX_IMAGES}, got {num_images}"
            )));
        }

        let captions = split_list(&request.captions);
        let idips = split_list(&request.idips);
        if request.images.len() != captions.len() || captions.len() != idips.len() {
            return Err(PredictError::InvalidInput(
                "the number of images, captions, and idips must be the same".to_string(),
            ));
        }

        let invocation = Invocation {
            prompt: &request.prompt,
            target_height,
            target_width,
            weight_id,
            weight_ip,
            latent_lora_scale,
            vae_lora_scale,
            images: &request.images,
            captions: &captions,
            idips: &idips,
        };

        // One output directory for the whole call. It is intentionally left
        // behind: the returned paths point into it.
        let output_dir = tempfile::tempdir()?.into_path();
        let mut output_paths = Vec::with_capacity(num_images as usize);

        for i in 0..num_images {
            let current_seed = seed + i64::from(i);
            let save_path = output_dir.join(format!("output_{i}.png"));
            let args = invocation.args(current_seed, &save_path);

            info!(
                "running: {} {} {}",
                self.python.display(),
                self.script.display(),
                args.join(" ")
            );
            let output = Command::new(&self.python)
                .arg(&self.script)
                .args(&args)
                .output()?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
                error!(
                    "inference stdout:\n{}",
                    String::from_utf8_lossy(&output.stdout)
                );
                error!("inference stderr:\n{stderr}");
                return Err(PredictError::Inference { stderr });
            }

            info!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
            output_paths.push(save_path);
        }

        Ok(output_paths)
    }
}
