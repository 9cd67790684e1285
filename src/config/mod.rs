pub mod tracing;

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Signing key used when none is configured. At least 64 bytes, as required
/// for cookie signing keys.
const DEFAULT_SECRET_KEY: &str =
    "supersecretkey-supersecretkey-supersecretkey-supersecretkey-forum";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCfg {
    pub bind_addr: String,
    /// Path to the SQLite database file.
    pub database_url: String,
    pub upload_dir: PathBuf,
    /// Glob the templates are loaded from.
    pub templates: String,
    pub secret_key: String,
    pub db_pool_size: usize,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            database_url: "instance/forum.db".into(),
            upload_dir: PathBuf::from("static/uploads"),
            templates: "templates/**/*".into(),
            secret_key: DEFAULT_SECRET_KEY.into(),
            db_pool_size: 10,
        }
    }
}

impl AppCfg {
    /// Defaults, then `appsettings.json`, then `APP_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppCfg::default()))
            .merge(Json::file("appsettings.json"))
            .merge(Env::prefixed("APP_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
