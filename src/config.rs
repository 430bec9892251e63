use clap::Parser;

/// Process configuration. Everything else (grid size, cooldowns,
/// multipliers) is fixed by the game rules and lives in crate constants.
#[derive(Debug, Parser)]
#[command(name = "yoink", about = "authoritative realtime server for the Yoink word game")]
pub struct Config {
    /// TCP port to listen on
    #[arg(long, default_value_t = 5177)]
    pub port: u16,

    /// dictionary source URL (one word per line); repeatable
    #[arg(long = "dict-url")]
    pub dict_urls: Vec<String>,

    /// dictionary file on disk (one word per line); repeatable
    #[arg(long = "dict-file")]
    pub dict_files: Vec<std::path::PathBuf>,

    /// HTTP worker count
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn level(&self) -> log::LevelFilter {
        match self.verbose {
            true => log::LevelFilter::Debug,
            false => log::LevelFilter::Info,
        }
    }
}
