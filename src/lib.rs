pub mod config;
pub mod dictionary;
pub mod gameroom;
pub mod hosting;
pub mod letters;

/// dimensional analysis types
pub type Points = u32;
pub type ConnId = u64;

// shared pool parameters
pub const GRID_SIZE: usize = 16;
pub const SPAWN_FLOOR_MS: u64 = 500;
pub const SPAWN_CEILING_MS: u64 = 10_000;

// player parameters
pub const BANK_CAPACITY: usize = 7;
pub const MAX_WORD_LEN: usize = 7;
pub const MAX_NAME_LEN: usize = 16;
pub const YOINK_COOLDOWN: std::time::Duration = std::time::Duration::from_millis(500);

// word submission rate limiting
pub const SUBMIT_BURST: f64 = 10.0;
pub const SUBMIT_REFILL_PER_SEC: f64 = 5.0;

// per-round score multipliers; rounds past the table reuse the tail
pub const MULTIPLIERS: [f64; 3] = [1.0, 1.2, 1.5];

/// trait for random generation, mostly for tests
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging and exit on ctrl-c
pub fn init(level: log::LevelFilter) {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}
