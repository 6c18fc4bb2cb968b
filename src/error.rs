use thiserror::Error;

/// Problems loading or validating a `GameConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Fatal errors surfaced by the binary. Gameplay never produces these.
#[derive(Error, Debug)]
pub enum ShooterError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),
}
