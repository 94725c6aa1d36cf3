use std::env;
use std::path::{Path, PathBuf};

/// Environment variables the inference script resolves its models through.
pub const FLORENCE2_MODEL_PATH: &str = "FLORENCE2_MODEL_PATH";
pub const SAM2_MODEL_PATH: &str = "SAM2_MODEL_PATH";
pub const FACE_ID_MODEL_PATH: &str = "FACE_ID_MODEL_PATH";
pub const CLIP_MODEL_PATH: &str = "CLIP_MODEL_PATH";
pub const FLUX_MODEL_PATH: &str = "FLUX_MODEL_PATH";
pub const DPG_VQA_MODEL_PATH: &str = "DPG_VQA_MODEL_PATH";
pub const DINO_MODEL_PATH: &str = "DINO_MODEL_PATH";

/// Filesystem locations of every checkpoint the pipeline loads.
///
/// The adapter only points at these paths; it never opens them. Whether they
/// exist is the inference script's problem at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoints {
    pub florence2: PathBuf,
    pub sam2: PathBuf,
    pub face_id: PathBuf,
    pub clip: PathBuf,
    pub flux: PathBuf,
    pub dpg_vqa: PathBuf,
    pub dino: PathBuf,
}

impl Default for Checkpoints {
    fn default() -> Self {
        Self::from_dir("./checkpoints")
    }
}

impl Checkpoints {
    /// Stock checkpoint layout rebased under `root`.
    pub fn from_dir(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            florence2: root.join("Florence-2-large"),
            sam2: root.join("sam2.1_hiera_large.pt"),
            face_id: root.join("model_ir_se50.pth"),
            clip: root.join("clip-vit-large-patch14"),
            flux: root.join("FLUX.1-dev"),
            dpg_vqa: root.join("mplug_visual-question-answering_coco_large_en"),
            dino: root.join("dino-vits16"),
        }
    }

    pub fn entries(&self) -> [(&'static str, &Path); 7] {
        [
            (FLORENCE2_MODEL_PATH, self.florence2.as_path()),
            (SAM2_MODEL_PATH, self.sam2.as_path()),
            (FACE_ID_MODEL_PATH, self.face_id.as_path()),
            (CLIP_MODEL_PATH, self.clip.as_path()),
            (FLUX_MODEL_PATH, self.flux.as_path()),
            (DPG_VQA_MODEL_PATH, self.dpg_vqa.as_path()),
            (DINO_MODEL_PATH, self.dino.as_path()),
        ]
    }

    /// Publishes every checkpoint path into the process environment. Runs
    /// once at startup; the variables are only read afterwards.
    pub fn export(&self) {
        for (key, path) in self.entries() {
            env::set_var(key, path);
        }
    }
}
