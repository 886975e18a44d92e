//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ConfigError, DashboardSettings, LoggingConfig, ProviderSettings,
};

use config::{Config, Environment, File};
use std::path::Path;

/// Load configuration from an optional file and the environment.
///
/// Environment variables use the `STOCKSCOPE` prefix and `__` as the
/// section separator, e.g. `STOCKSCOPE__DASHBOARD__NEWS_LIMIT=3`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("STOCKSCOPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
