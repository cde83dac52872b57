pub mod config;
pub mod openai;

pub use config::{AppConfig, ConfigPresence};
pub use openai::OpenAiClient;
