use std::collections::HashSet;
use std::path::PathBuf;

/// Words the engine falls back to when no configured source loads, so a
/// fresh checkout still runs end to end.
const FALLBACK: &[&str] = &[
    "ACE", "AGE", "AIR", "ANT", "ARM", "ART", "BAT", "BED", "BIG", "BOX", "CAR", "CAT", "COG",
    "DOG", "EAR", "EAT", "EGG", "END", "FAR", "FIG", "FUN", "GAS", "HAT", "ICE", "INK", "JAM",
    "JET", "KEY", "LOG", "MAP", "NET", "OAK", "OIL", "PAN", "PEN", "PIG", "RAT", "RED", "RUN",
    "SEA", "SIT", "SUN", "TAR", "TEN", "TIN", "TOP", "URN", "VAN", "WAX", "YES", "ZOO", "BARN",
    "CARE", "DARE", "EARN", "FERN", "GAIN", "HARE", "IRON", "JEST", "KITE", "LIME", "MINE",
    "NOTE", "OPEN", "PINE", "RAIN", "SAGE", "TIME", "VINE", "WINE", "YARN", "ZEST", "BRAIN",
    "CRANE", "DRAIN", "GRAIN", "PLANE", "SLATE", "STARE", "TRAIN", "JESTING", "RESTING",
    "STORAGE", "TANGLES",
];

/// Immutable uppercase word set, loaded once at startup and shared
/// read-only across every room.
#[derive(Debug)]
pub struct Dictionary(HashSet<String>);

impl Dictionary {
    /// membership over uppercase A..Z strings
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<String> for Dictionary {
    fn from_iter<I: IntoIterator<Item = String>>(words: I) -> Self {
        Self(
            words
                .into_iter()
                .map(|w| w.trim().to_uppercase())
                .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_uppercase()))
                .collect(),
        )
    }
}

/// A provider of candidate words. URL fetch, local files, and the
/// embedded fallback all compose through this seam; the loader unions
/// whatever resolves.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> String;
    async fn words(&self) -> anyhow::Result<Vec<String>>;
}

/// One word per line over HTTP.
pub struct Remote(pub String);

#[async_trait::async_trait]
impl Source for Remote {
    fn name(&self) -> String {
        self.0.clone()
    }
    async fn words(&self) -> anyhow::Result<Vec<String>> {
        let body = reqwest::get(&self.0)
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body.lines().map(String::from).collect())
    }
}

/// One word per line on disk.
pub struct Local(pub PathBuf);

#[async_trait::async_trait]
impl Source for Local {
    fn name(&self) -> String {
        self.0.display().to_string()
    }
    async fn words(&self) -> anyhow::Result<Vec<String>> {
        let body = tokio::fs::read_to_string(&self.0).await?;
        Ok(body.lines().map(String::from).collect())
    }
}

/// The compiled-in word set.
pub struct Builtin;

#[async_trait::async_trait]
impl Source for Builtin {
    fn name(&self) -> String {
        "builtin word set".to_string()
    }
    async fn words(&self) -> anyhow::Result<Vec<String>> {
        Ok(FALLBACK.iter().map(|w| w.to_string()).collect())
    }
}

/// Sources for the given configuration: every URL, then every file, in
/// the order they were passed.
pub fn configured(urls: &[String], files: &[PathBuf]) -> Vec<Box<dyn Source>> {
    let mut sources: Vec<Box<dyn Source>> = Vec::new();
    for url in urls {
        sources.push(Box::new(Remote(url.clone())));
    }
    for file in files {
        sources.push(Box::new(Local(file.clone())));
    }
    sources
}

/// Load and union every configured source. Individual failures are
/// non-fatal; when nothing usable loads, the builtin set keeps the
/// server playable.
pub async fn load(sources: &[Box<dyn Source>]) -> Dictionary {
    let mut words = Vec::new();
    for source in sources {
        match source.words().await {
            Ok(mut batch) => {
                log::info!("loaded {} words from {}", batch.len(), source.name());
                words.append(&mut batch);
            }
            Err(e) => log::warn!("dictionary source {} failed: {}", source.name(), e),
        }
    }
    let dictionary = words.into_iter().collect::<Dictionary>();
    match dictionary.is_empty() {
        false => dictionary,
        true => {
            log::warn!("no dictionary source loaded, falling back to the {}", Builtin.name());
            Builtin
                .words()
                .await
                .unwrap_or_default()
                .into_iter()
                .collect()
        }
    }
}
