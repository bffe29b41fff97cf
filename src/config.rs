// Configuration loading via the 'config' crate and 'dotenv'

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_DATASET_URL: &str =
    "https://dataset-market.s3.us-east-1.amazonaws.com/total_data.csv";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Remote CSV document fetched in full on every request.
    pub dataset_url: String,
    pub server_address: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            // Add default values
            .set_default("dataset_url", DEFAULT_DATASET_URL)?
            .set_default("server_address", "0.0.0.0:8080")?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP_SERVER_ADDRESS)
            .add_source(Environment::with_prefix("APP").separator("_"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
