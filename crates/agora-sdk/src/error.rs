use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("config error: {0}")]
    Config(#[from] agora_config::ConfigError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("build error: {0}")]
    Build(#[from] agora_store::BuildError),
}

pub type SdkResult<T> = Result<T, SdkError>;
