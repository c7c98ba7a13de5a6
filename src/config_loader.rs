use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Service configuration: model location, bind address, and an optional
/// override of the artifact's decision threshold.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChurnConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub threshold: Option<f64>,
}

fn default_model_dir() -> String {
    "model".to_string()
}

impl Default for ChurnConfig {
    fn default() -> Self {
        ChurnConfig {
            model_dir: default_model_dir(),
            server: ServerConfig::default(),
            threshold: None,
        }
    }
}

/// Layered load: built-in defaults, then `churnd.toml` (or an explicit
/// path), then `CHURND_`-prefixed environment variables.
pub fn load_config(path: Option<&str>) -> Result<ChurnConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(ChurnConfig::default()))
        .merge(Toml::file(path.unwrap_or("churnd.toml")))
        .merge(Env::prefixed("CHURND_").split("__"));

    let config: ChurnConfig = figment.extract()?;

    if let Some(threshold) = config.threshold {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(figment::Error::from(format!(
                "threshold override {threshold} outside (0, 1)"
            )));
        }
    }

    Ok(config)
}
