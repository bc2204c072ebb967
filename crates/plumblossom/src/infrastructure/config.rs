use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::anyhow;
use once_cell::sync::OnceCell;
use plumblossom_scraper::sources::{self, SourceSettings};
use serde::{Deserialize, Serialize};

pub static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SourcesConfig {
    #[serde(default = "default_blogspot_url")]
    pub blogspot: String,
    #[serde(default = "default_maehwasup_url")]
    pub maehwasup: String,
    #[serde(default = "default_skydemon_url")]
    pub skydemon: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            blogspot: default_blogspot_url(),
            maehwasup: default_maehwasup_url(),
            skydemon: default_skydemon_url(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_flaresolverr_url")]
    pub flaresolverr_url: String,
    /// Seconds a scraped listing is served before the sources are asked again
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Milliseconds between two listing pages of the same site
    #[serde(default = "default_page_delay")]
    pub page_delay: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_direct_timeout")]
    pub direct_timeout: u64,
    #[serde(default = "default_bypass_timeout")]
    pub bypass_timeout: u64,
    #[serde(default = "default_content_bypass_timeout")]
    pub content_bypass_timeout: u64,
    /// Precomputed listings to serve instead of scraping, written by `plumblossom-cli scrape`
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: plumblossom_home().join("config.yml"),
            port: default_port(),
            flaresolverr_url: default_flaresolverr_url(),
            cache_ttl: default_cache_ttl(),
            sources: SourcesConfig::default(),
            page_delay: default_page_delay(),
            max_pages: default_max_pages(),
            direct_timeout: default_direct_timeout(),
            bypass_timeout: default_bypass_timeout(),
            content_bypass_timeout: default_content_bypass_timeout(),
            snapshot_path: None,
        }
    }
}

fn plumblossom_home() -> PathBuf {
    match std::env::var("PLUMBLOSSOM_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".plumblossom"),
    }
}

fn default_port() -> u16 {
    3000
}

fn default_flaresolverr_url() -> String {
    "http://localhost:8191/v1".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_blogspot_url() -> String {
    sources::BLOGSPOT_URL.to_string()
}

fn default_maehwasup_url() -> String {
    sources::MAEHWASUP_URL.to_string()
}

fn default_skydemon_url() -> String {
    sources::SKYDEMON_URL.to_string()
}

fn default_page_delay() -> u64 {
    1000
}

fn default_max_pages() -> u32 {
    50
}

fn default_direct_timeout() -> u64 {
    30
}

fn default_bypass_timeout() -> u64 {
    90
}

fn default_content_bypass_timeout() -> u64 {
    60
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => plumblossom_home().join("config.yml"),
        };

        let mut cfg = match std::fs::File::open(&config_path) {
            Ok(file) => {
                info!("open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                cfg
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("write default config at {:?}", cfg.path);
                cfg
            }
        };

        cfg.apply_env(|key| std::env::var(key).ok())?;

        Ok(cfg)
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }

    /// `PORT` and `FLARESOLVERR_URL` win over the file.
    fn apply_env<F>(&mut self, var: F) -> Result<(), anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = var("PORT") {
            self.port = port
                .parse()
                .map_err(|e| anyhow!("invalid PORT {port:?}: {e}"))?;
        }

        if let Some(url) = var("FLARESOLVERR_URL") {
            self.flaresolverr_url = url;
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            blogspot_url: self.sources.blogspot.clone(),
            maehwasup_url: self.sources.maehwasup.clone(),
            skydemon_url: self.sources.skydemon.clone(),
            direct_timeout: Duration::from_secs(self.direct_timeout),
            bypass_timeout: Duration::from_secs(self.bypass_timeout),
            content_bypass_timeout: Duration::from_secs(self.content_bypass_timeout),
            page_delay: Duration::from_millis(self.page_delay),
            max_pages: self.max_pages,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_match_source_settings() {
        let cfg = Config::default();
        let settings = cfg.source_settings();
        let defaults = SourceSettings::default();

        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(settings.blogspot_url, defaults.blogspot_url);
        assert_eq!(settings.skydemon_url, defaults.skydemon_url);
        assert_eq!(settings.direct_timeout, defaults.direct_timeout);
        assert_eq!(settings.bypass_timeout, defaults.bypass_timeout);
        assert_eq!(settings.content_bypass_timeout, defaults.content_bypass_timeout);
        assert_eq!(settings.page_delay, defaults.page_delay);
        assert_eq!(settings.max_pages, defaults.max_pages);
    }

    #[test]
    fn test_open_writes_default_then_reads_partial_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("config.yml");

        let cfg = Config::open(Some(&path))?;
        assert!(path.exists());
        assert_eq!(cfg.flaresolverr_url, "http://localhost:8191/v1");

        std::fs::write(
            &path,
            "cache_ttl: 60\nsources:\n  maehwasup: http://127.0.0.1:9000/\nsnapshot_path: data/chapters.json\n",
        )?;
        let cfg: Config = serde_yml::from_str(&std::fs::read_to_string(&path)?)?;

        assert_eq!(cfg.cache_ttl, 60);
        assert_eq!(cfg.sources.maehwasup, "http://127.0.0.1:9000/");
        assert_eq!(cfg.sources.blogspot, sources::BLOGSPOT_URL);
        assert_eq!(cfg.snapshot_path.as_deref(), Some("data/chapters.json"));
        assert_eq!(cfg.port, 3000);
        Ok(())
    }

    #[test]
    fn test_env_overrides() -> anyhow::Result<()> {
        let mut cfg = Config::default();

        cfg.apply_env(|key| match key {
            "PORT" => Some("8080".to_string()),
            "FLARESOLVERR_URL" => Some("http://solver:8191/v1".to_string()),
            _ => None,
        })?;

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.flaresolverr_url, "http://solver:8191/v1");
        assert!(
            Config::default()
                .apply_env(|key| (key == "PORT").then(|| "eighty".to_string()))
                .is_err()
        );
        Ok(())
    }
}
