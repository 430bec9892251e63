//! Yoink server binary.
//!
//! Loads the dictionary once at startup, then serves rooms over
//! WebSocket with a plain liveness route at `/`.

use clap::Parser;
use std::sync::Arc;
use yoink::config::Config;
use yoink::dictionary;
use yoink::hosting::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    yoink::init(config.level());
    let sources = dictionary::configured(&config.dict_urls, &config.dict_files);
    let dictionary = Arc::new(dictionary::load(&sources).await);
    log::info!("dictionary ready with {} words", dictionary.len());
    Server::run(config, dictionary).await?;
    Ok(())
}
