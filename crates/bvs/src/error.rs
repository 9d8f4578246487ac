#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Invalid settings file: {0}")]
    Settings(String),

    #[error("Invalid environment variable {name}: {value}")]
    InvalidEnv { name: String, value: String },

    #[error("Cache error: {0}")]
    Cache(String),
}
