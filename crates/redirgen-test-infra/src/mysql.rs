use crate::{Result, TestInfraError};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};
use typed_builder::TypedBuilder;

const MYSQL_PORT: u16 = 3306;

#[derive(TypedBuilder)]
pub struct MysqlConfig {
    #[builder(default = "8.4".to_string())]
    tag: String,
    #[builder(default = "cms".to_string())]
    database: String,
    #[builder(default = "cms".to_string())]
    username: String,
    #[builder(default = "cms".to_string())]
    password: String,
    /// Connection attempts made by [`MySqlServer::connect`]. MySQL logs
    /// "ready for connections" for its bootstrap server too, so the first
    /// attempts may be refused.
    #[builder(default = 20)]
    connect_attempts: u32,
    #[builder(default = Duration::from_millis(500))]
    retry_delay: Duration,
}

/// A disposable MySQL server standing in for the host platform's database.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
    config: MysqlConfig,
}

impl MySqlServer {
    pub async fn new(config: MysqlConfig) -> Result<Self> {
        let container = GenericImage::new("mysql", config.tag.as_str())
            .with_exposed_port(MYSQL_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", config.database.as_str())
            .with_env_var("MYSQL_USER", config.username.as_str())
            .with_env_var("MYSQL_PASSWORD", config.password.as_str())
            .with_env_var("MYSQL_ROOT_PASSWORD", "root")
            .start()
            .await?;

        Ok(Self { container, config })
    }

    pub async fn database_url(&self) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(MYSQL_PORT).await?;
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.config.username, self.config.password, host, port, self.config.database
        ))
    }

    /// Opens a pool once the server accepts connections and runs each
    /// statement of `schema` on it.
    pub async fn connect(&self, schema: &[&str]) -> Result<MySqlPool> {
        let url = self.database_url().await?;
        let pool = self.connect_with_retry(&url).await?;
        for statement in schema.iter().copied() {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(pool)
    }

    async fn connect_with_retry(&self, url: &str) -> Result<MySqlPool> {
        let mut attempt = 1;
        loop {
            match MySqlPoolOptions::new().max_connections(5).connect(url).await {
                Ok(pool) => return Ok(pool),
                Err(_) if attempt < self.config.connect_attempts => {
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => {
                    return Err(TestInfraError::Connect {
                        attempts: attempt,
                        source: e,
                    })
                }
            }
        }
    }
}
