use serde::{Deserialize, Serialize};

/// Port used by the browser-bundled daemon; never monitored.
pub const EXCLUDED_PORT: &str = "9151";

/// Port used when no configured port survives validation.
pub const DEFAULT_PORT: &str = "9051";

/// Contents of the monitor configuration file.
///
/// # Fields Overview
///
/// - `cookie_paths`: candidate locations of the control-port authentication
///   cookie, tried in order; `$VAR` and `${VAR}` are expanded
/// - `ports`: control ports to try, in order, on the loopback interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub cookie_paths: Vec<String>,
    #[serde(default)]
    pub ports: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cookie_paths: vec![
                r"C:\Program Files (x86)\OmniMix\tor\data\control_auth_cookie".to_string(),
                "/home/your_name/.tor/control_auth_cookie".to_string(),
                "/var/lib/tor/control_auth_cookie".to_string(),
            ],
            ports: vec![DEFAULT_PORT.to_string()],
        }
    }
}
