use std::env;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory holding the puzzle documents
    pub puzzle_dir: PathBuf,
    /// Directory with the editor page and its scripts, served as a fallback
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;
        let puzzle_dir = env::var("PUZZLE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./puzzles"));
        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            puzzle_dir,
            static_dir,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
