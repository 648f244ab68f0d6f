//! Command-line argument parsing for Parley.
//!
//! Three subcommands: `chat` runs the interactive session, `seed` creates the
//! sample SQLite database, and `schema` prints the introspected schema and
//! exits.

use crate::config::{Config, ConnectionConfig, ModelConfig, MysqlConfig, DEFAULT_SQLITE_PATH};
use crate::db::DatabaseBackend;
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Chat with your database in plain English.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat session against a database
    Chat(ChatArgs),
    /// Create the sample student database
    Seed(SeedArgs),
    /// Print the introspected database schema and exit
    Schema(ConnectionArgs),
}

/// Arguments shared by every command that opens a database handle.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Database backend to use
    #[arg(short = 'b', long, value_name = "BACKEND", default_value = "sqlite")]
    pub backend: String,

    /// SQLite database file (sqlite backend)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SQLITE_PATH)]
    pub db_path: PathBuf,

    /// Database host (mysql backend)
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Database user (mysql backend)
    #[arg(short = 'U', long, value_name = "USER")]
    pub user: Option<String>,

    /// Database password (mysql backend)
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Database name (mysql backend)
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Database port (mysql backend)
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,
}

impl ConnectionArgs {
    /// Parses the selected backend.
    pub fn backend(&self) -> Result<DatabaseBackend> {
        DatabaseBackend::parse(&self.backend).ok_or_else(|| {
            crate::error::ParleyError::config(format!(
                "Unknown backend: {}. Expected: sqlite or mysql",
                self.backend
            ))
        })
    }

    /// Builds the connection configuration.
    ///
    /// CLI arguments take precedence over the config file, which in turn
    /// takes precedence over MYSQL_* environment variables. The result is
    /// not validated here; validation happens at connect time.
    pub fn to_connection_config(&self, config: &Config) -> Result<ConnectionConfig> {
        match self.backend()? {
            DatabaseBackend::Sqlite => Ok(ConnectionConfig::sqlite(self.db_path.clone())),
            DatabaseBackend::Mysql => {
                let mut mysql = MysqlConfig {
                    host: self.host.clone().unwrap_or_else(|| config.mysql.host.clone()),
                    user: self.user.clone().unwrap_or_else(|| config.mysql.user.clone()),
                    password: self
                        .password
                        .clone()
                        .unwrap_or_else(|| config.mysql.password.clone()),
                    database: self
                        .database
                        .clone()
                        .unwrap_or_else(|| config.mysql.database.clone()),
                    port: self.port.unwrap_or(config.mysql.port),
                };
                mysql.apply_env_defaults();
                Ok(ConnectionConfig::Mysql(mysql))
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Model name to use for the reasoning agent
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (0.0 to 1.0)
    #[arg(short = 't', long, value_name = "TEMP")]
    pub temperature: Option<f32>,

    /// API key (falls back to GROQ_API_KEY)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Disable token streaming
    #[arg(long)]
    pub no_stream: bool,
}

impl ChatArgs {
    /// Builds the model configuration, CLI arguments over config file.
    pub fn to_model_config(&self, config: &Config) -> ModelConfig {
        let mut model = config.model.clone();
        if let Some(name) = &self.model {
            model.model = name.clone();
        }
        if let Some(temperature) = self.temperature {
            model.temperature = temperature;
        }
        if self.api_key.is_some() {
            model.api_key = self.api_key.clone();
        }
        if self.no_stream {
            model.streaming = false;
        }
        model
    }
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Where to create the sample database
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SQLITE_PATH)]
    pub db_path: PathBuf,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_chat_defaults_to_sqlite() {
        let cli = parse(&["parley", "chat"]);
        let Command::Chat(chat) = cli.command else {
            panic!("expected chat subcommand");
        };

        assert_eq!(chat.connection.backend().unwrap(), DatabaseBackend::Sqlite);
        let config = chat
            .connection
            .to_connection_config(&Config::default())
            .unwrap();
        assert_eq!(
            config,
            ConnectionConfig::sqlite(DEFAULT_SQLITE_PATH)
        );
    }

    #[test]
    fn test_chat_mysql_args_override_config_file() {
        let cli = parse(&[
            "parley", "chat", "-b", "mysql", "-H", "db.local", "-U", "reader", "--password",
            "pw", "-d", "school",
        ]);
        let Command::Chat(chat) = cli.command else {
            panic!("expected chat subcommand");
        };

        let mut file_config = Config::default();
        file_config.mysql.host = "other-host".to_string();
        file_config.mysql.port = 3307;

        let config = chat.connection.to_connection_config(&file_config).unwrap();
        let ConnectionConfig::Mysql(mysql) = config else {
            panic!("expected mysql config");
        };
        assert_eq!(mysql.host, "db.local");
        assert_eq!(mysql.port, 3307);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let cli = parse(&["parley", "schema", "-b", "postgres"]);
        let Command::Schema(conn) = cli.command else {
            panic!("expected schema subcommand");
        };
        assert!(conn.backend().is_err());
    }

    #[test]
    fn test_model_overrides() {
        let cli = parse(&[
            "parley",
            "chat",
            "--model",
            "llama3-70b-8192",
            "--temperature",
            "0.1",
            "--no-stream",
        ]);
        let Command::Chat(chat) = cli.command else {
            panic!("expected chat subcommand");
        };

        let model = chat.to_model_config(&Config::default());
        assert_eq!(model.model, "llama3-70b-8192");
        assert_eq!(model.temperature, 0.1);
        assert!(!model.streaming);
    }

    #[test]
    fn test_seed_custom_path() {
        let cli = parse(&["parley", "seed", "--db-path", "/tmp/demo.db"]);
        let Command::Seed(seed) = cli.command else {
            panic!("expected seed subcommand");
        };
        assert_eq!(seed.db_path, PathBuf::from("/tmp/demo.db"));
    }
}
