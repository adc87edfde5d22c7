use std::env;
use std::fs::File;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};

pub mod gateway;
pub mod idp;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct Config {
    pub gateway: gateway::Config,
    pub idp: idp::Config,
}

impl Default for Config {
    fn default() -> Self {
        dotenv().ok();

        let rust_log = env::var("RUST_LOG").unwrap_or("info".into());
        let level = LevelFilter::from_str(&rust_log).unwrap_or(LevelFilter::Info);
        let log_file = env::var("SERVICE_NAME")
            .map(|pkg| format!("{pkg}.log"))
            .unwrap_or("service.log".into());

        CombinedLogger::init(vec![
            TermLogger::new(
                level,
                simplelog::Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(
                level,
                simplelog::Config::default(),
                File::create(log_file).expect("Failed to create log file"),
            ),
        ])
        .expect("Failed to initialize logger");

        let gateway_cfg = gateway::Config::new(
            env::var("GRAPHQL_URL").expect("GRAPHQL_URL must be set"),
            env::var("GRAPHQL_ADMIN_SECRET").ok(),
        );

        let idp_cfg = idp::Config::new(env::var("AUTH_URL").expect("AUTH_URL must be set"));

        Self {
            gateway: gateway_cfg,
            idp: idp_cfg,
        }
    }
}

pub fn init_http_client() -> reqwest::Client {
    match reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            panic!("Failed to initialize HTTP client: {e}")
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("gateway reported an error: {0}")]
    Graphql(String),
    #[error("malformed gateway response: missing '{0}'")]
    MalformedResponse(&'static str),

    #[error(transparent)]
    _Reqwest(#[from] reqwest::Error),
}
