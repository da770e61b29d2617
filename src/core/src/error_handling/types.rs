use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    JsonError(String),
    TomlError(String),
    UnsupportedFormat(String),
    CookiePathsEmpty,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::JsonError(e) => write!(f, "JSON parsing error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::UnsupportedFormat(e) => write!(f, "Unsupported configuration format: {}", e),
            ConfigError::CookiePathsEmpty => {
                write!(f, "'cookie_paths' array is empty or missing in config")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum ControlError {
    ConnectionFailed(String),
    Io(std::io::Error),
    Closed,
    AuthenticationFailed(String),
    SubscriptionFailed(String),
    CookieNotFound(Vec<String>),
    CookieRead(std::io::Error),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::ConnectionFailed(e) => write!(f, "Connection failed: {}", e),
            ControlError::Io(e) => write!(f, "Control port IO error: {}", e),
            ControlError::Closed => write!(f, "Control connection closed by peer"),
            ControlError::AuthenticationFailed(e) => write!(f, "Authentication failed: {}", e),
            ControlError::SubscriptionFailed(e) => write!(f, "Event subscription failed: {}", e),
            ControlError::CookieNotFound(paths) => write!(
                f,
                "Cookie file not found in any configured path: {}",
                paths.join(", ")
            ),
            ControlError::CookieRead(e) => write!(f, "Failed to read cookie file: {}", e),
        }
    }
}

impl std::error::Error for ControlError {}

impl From<std::io::Error> for ControlError {
    fn from(err: std::io::Error) -> Self {
        ControlError::Io(err)
    }
}

#[derive(Debug)]
pub enum SinkError {
    CreateDirFailed(std::io::Error),
    OpenFailed(std::io::Error),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::CreateDirFailed(e) => write!(f, "Failed to create log directory: {}", e),
            SinkError::OpenFailed(e) => write!(f, "Failed to open log file: {}", e),
        }
    }
}

impl std::error::Error for SinkError {}

#[derive(Debug)]
pub enum MonitorError {
    Setup(ControlError),
    TransportLost(ControlError),
    TaskFailed(String),
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Setup(e) => write!(f, "Setup error: {}", e),
            MonitorError::TransportLost(e) => write!(f, "Transport lost: {}", e),
            MonitorError::TaskFailed(e) => write!(f, "Monitor task failed: {}", e),
        }
    }
}

impl std::error::Error for MonitorError {}
