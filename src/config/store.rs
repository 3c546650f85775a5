//! Document store configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// PostgreSQL connection URL
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Run migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps; contents are lost on restart
    #[default]
    Memory,
    Postgres,
}

impl StoreConfig {
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        match self.backend {
            StoreBackend::Postgres => {
                let url = self
                    .database_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .ok_or(ValidationError::MissingRequired("DATABASE_URL"))?;
                if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                    return Err(ValidationError::InvalidDatabaseUrl);
                }
                if self.max_connections == 0 {
                    return Err(ValidationError::InvalidPoolSize);
                }
                if self.max_connections > 100 {
                    return Err(ValidationError::PoolSizeTooLarge);
                }
            }
            StoreBackend::Memory if production => {
                return Err(ValidationError::MockInProduction("store"));
            }
            StoreBackend::Memory => {}
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_run_migrations() -> bool {
    true
}
