pub mod groq; // Groq chat completions
pub mod sigv4;
pub mod storage;
pub mod vision;

pub use groq::GroqClient;
pub use storage::{ImageStore, S3ImageStore};
pub use vision::VisionModel;
