use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::{WaterfallError, WaterfallResult};

pub const API_SERVER_DEFAULT: &str = "https://evergreen.mongodb.com";
pub const CONFIG_FILENAME: &str = "waterfall.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JOBS: usize = 4;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub api: Option<String>,
    pub ui: Option<String>,
    pub user: Option<String>,
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

impl ServerConfig {
    pub fn api(&self) -> &str {
        self.api.as_deref().unwrap_or(API_SERVER_DEFAULT)
    }

    /// The UI server hosts task logs; Evergreen serves both from one host by default.
    pub fn ui(&self) -> &str {
        self.ui.as_deref().unwrap_or_else(|| self.api())
    }

    pub fn timeout(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// Username and key, only when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.api_key.as_deref()) {
            (Some(user), Some(key)) if !user.is_empty() && !key.is_empty() => Some((user, key)),
            _ => None,
        }
    }

    pub fn to_effective(&self) -> Self {
        Self {
            api: Some(self.api().to_string()),
            ui: Some(self.ui().to_string()),
            user: self.user.clone(),
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            timeout: Some(self.timeout()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DrillDownConfig {
    /// Maximum number of task detail requests in flight
    pub jobs: Option<usize>,
}

impl DrillDownConfig {
    pub fn jobs(&self) -> usize {
        self.jobs.filter(|j| *j > 0).unwrap_or(DEFAULT_JOBS)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    // Top-level fields
    pub project: Option<String>,
    pub count: Option<i64>,

    // Nested sections
    pub log: Option<LogConfig>,
    pub server: Option<ServerConfig>,
    pub drill_down: Option<DrillDownConfig>,
}

impl Config {
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn count(&self) -> i64 {
        self.count.unwrap_or(3)
    }

    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn drill_down(&self) -> DrillDownConfig {
        self.drill_down.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            project: self.project.clone(),
            count: Some(self.count()),
            log: Some(self.log().to_effective()),
            server: Some(self.server().to_effective()),
            drill_down: Some(DrillDownConfig {
                jobs: Some(self.drill_down().jobs()),
            }),
        }
    }

    /// Pick the project to report on: explicit choice first, then configuration.
    pub fn resolve_project(&self, cli_project: Option<&str>) -> WaterfallResult<String> {
        cli_project
            .filter(|p| !p.trim().is_empty())
            .or(self.project())
            .map(|p| p.to_string())
            .ok_or(WaterfallError::NoDefaultProject)
    }
}

/// Contents of the Evergreen CLI settings file (`.evergreen.yml`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EvergreenSettings {
    pub user: Option<String>,
    pub api_key: Option<String>,
    pub api_server_host: Option<String>,
    pub ui_server_host: Option<String>,
    #[serde(default)]
    pub projects: Vec<EvergreenProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvergreenProject {
    pub name: String,
    #[serde(default)]
    pub default: bool,
}

impl EvergreenSettings {
    pub fn default_project(&self) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.default)
            .map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
    pub api_server: Option<String>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| load(&CliOverrides::default()))
}

pub fn init_with_overrides(overrides: &CliOverrides) {
    let _ = CONFIG.set(load(overrides));
}

fn load(overrides: &CliOverrides) -> Config {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_from(&cwd, dirs_next::home_dir().as_deref(), overrides)
}

/// Build the configuration seen from `cwd`, in increasing precedence:
/// Evergreen settings file, nearest `waterfall.toml`, CLI arguments.
pub fn load_from(cwd: &Path, home: Option<&Path>, overrides: &CliOverrides) -> Config {
    let mut cfg = Config::default();

    // 1) Evergreen settings: first candidate that exists wins
    if let Some(path) = find_evergreen_settings(cwd, home)
        && let Some(settings) = read_evergreen_settings(&path)
    {
        debug!("Using Evergreen settings from {}", path.display());
        apply_evergreen_settings(&mut cfg, &settings);
    }

    // 2) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file(cwd)
        && let Some(file_cfg) = read_config_file(&path)
    {
        debug!("Using config file {}", path.display());
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 3) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides);

    cfg
}

fn read_config_file(path: &Path) -> Option<Config> {
    let contents = fs::read_to_string(path).ok()?;
    match toml::from_str::<Config>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

fn read_evergreen_settings(path: &Path) -> Option<EvergreenSettings> {
    let contents = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str::<EvergreenSettings>(&contents) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

fn apply_evergreen_settings(cfg: &mut Config, settings: &EvergreenSettings) {
    let mut server = cfg.server.clone().unwrap_or_default();
    if settings.user.is_some() {
        server.user = settings.user.clone();
    }
    if settings.api_key.is_some() {
        server.api_key = settings.api_key.clone();
    }
    if let Some(host) = &settings.api_server_host {
        server.api = Some(strip_api_suffix(host).to_string());
    }
    if settings.ui_server_host.is_some() {
        server.ui = settings.ui_server_host.clone();
    }
    cfg.server = Some(server);

    if let Some(project) = settings.default_project() {
        cfg.project = Some(project.to_string());
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    // Merge top-level fields
    if file.project.is_some() {
        cfg.project = file.project.clone();
    }
    if file.count.is_some() {
        cfg.count = file.count;
    }

    // Merge log section
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }

    // Merge server section
    if let Some(file_server) = &file.server {
        let mut server = cfg.server.clone().unwrap_or_default();
        if let Some(api) = &file_server.api {
            server.api = Some(strip_api_suffix(api).to_string());
        }
        if file_server.ui.is_some() {
            server.ui = file_server.ui.clone();
        }
        if file_server.user.is_some() {
            server.user = file_server.user.clone();
        }
        if file_server.api_key.is_some() {
            server.api_key = file_server.api_key.clone();
        }
        if file_server.timeout.is_some() {
            server.timeout = file_server.timeout;
        }
        cfg.server = Some(server);
    }

    // Merge drill-down section
    if let Some(file_drill) = &file.drill_down {
        let mut drill = cfg.drill_down.clone().unwrap_or_default();
        if file_drill.jobs.is_some() {
            drill.jobs = file_drill.jobs;
        }
        cfg.drill_down = Some(drill);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) {
    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    // Server overrides
    if let Some(api) = &overrides.api_server
        && !api.trim().is_empty()
    {
        let mut server = cfg.server.clone().unwrap_or_default();
        server.api = Some(strip_api_suffix(api.trim()).to_string());
        cfg.server = Some(server);
    }
}

/// Evergreen settings usually name the API endpoint (`.../api`); REST paths hang off the host.
fn strip_api_suffix(host: &str) -> &str {
    let host = host.trim_end_matches('/');
    host.strip_suffix("/api").unwrap_or(host)
}

fn find_evergreen_settings(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![cwd.join(".evergreen.yml")];
    if let Some(home) = home {
        candidates.push(home.join(".evergreen.yml"));
        candidates.push(home.join("cli_bin").join(".evergreen.yml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

fn find_nearest_config_file(cwd: &Path) -> Option<PathBuf> {
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled(),
    }
}
