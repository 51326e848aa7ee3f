use clap::Parser;
use serde::Deserialize;

/// Command-line flags. Anything given here wins over the file and the environment.
#[derive(Parser, Debug, Default, PartialEq)]
#[clap(author, version, about)]
pub struct Args {
    /// Path of the configuration file, without extension
    #[clap(long, default_value = "setup")]
    pub config: String,
    /// Which errors we want to log (info, warn or error)
    #[clap(short, long)]
    pub log_level: Option<String>,
    /// Address the web server binds to
    #[clap(long)]
    pub host: Option<String>,
    /// Web server port
    #[clap(short, long)]
    pub port: Option<u16>,
    /// SQLite connection string, e.g. sqlite://questions.db
    #[clap(long)]
    pub database_url: Option<String>,
    /// Size of the connection pool
    #[clap(long)]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Settings {
    pub log_level: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl Settings {
    /// Layers defaults, the optional config file, `QUIZ_*` variables and the flags.
    pub fn load(args: &Args) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("log_level", "info")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3030_i64)?
            .set_default("database_url", "sqlite://questions.db")?
            .set_default("max_connections", 5_i64)?
            .add_source(config::File::with_name(&args.config).required(false))
            .add_source(config::Environment::with_prefix("QUIZ"))
            .set_override_option("log_level", args.log_level.clone())?
            .set_override_option("host", args.host.clone())?
            .set_override_option("port", args.port.map(i64::from))?
            .set_override_option("database_url", args.database_url.clone())?
            .set_override_option("max_connections", args.max_connections.map(i64::from))?
            .build()?
            .try_deserialize::<Settings>()
    }
}
