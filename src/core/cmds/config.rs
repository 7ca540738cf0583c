use log::info;

use crate::core::cli::PrintConfigArgs;
use crate::types::AppResult;
use crate::types::config::{Config, config};

pub async fn execute_config(args: PrintConfigArgs) -> AppResult<()> {
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&config().to_effective())?);
        return Ok(());
    }

    for line in config_table(config()) {
        info!("{line}");
    }
    Ok(())
}

/// Table view of the effective configuration. Secrets are masked.
fn config_table(cfg: &Config) -> Vec<String> {
    let effective_config = cfg.to_effective();
    let mut lines = vec!["Effective Configuration:".to_string(), String::new()];

    lines.push("Global:".to_string());
    match &effective_config.project {
        Some(project) => lines.push(format!("  project: {project}")),
        None => lines.push("  project: (not set)".to_string()),
    }
    lines.push(format!("  count: {}", effective_config.count()));

    lines.push(String::new());
    lines.push("Log:".to_string());
    let log = effective_config.log();
    lines.push(format!("  level: {}", log.level()));
    lines.push(
        match log.color() {
            Some(true) => "  color: on",
            Some(false) => "  color: off",
            None => "  color: auto",
        }
        .to_string(),
    );

    lines.push(String::new());
    lines.push("Server:".to_string());
    let server = effective_config.server();
    lines.push(format!("  api: {}", server.api()));
    lines.push(format!("  ui: {}", server.ui()));
    lines.push(format!("  timeout: {}s", server.timeout()));
    match server.credentials() {
        Some((user, key)) => lines.push(format!("  credentials: {user} / {key}")),
        None => lines.push("  credentials: (not set)".to_string()),
    }

    lines.push(String::new());
    lines.push("Drill-down:".to_string());
    lines.push(format!("  jobs: {}", effective_config.drill_down().jobs()));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::ServerConfig;

    #[test]
    fn table_masks_the_api_key() {
        let cfg = Config {
            project: Some("mongodb-mongo-master".to_string()),
            server: Some(ServerConfig {
                user: Some("jane".to_string()),
                api_key: Some("s3cr3t".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let lines = config_table(&cfg);
        assert!(lines.contains(&"  credentials: jane / ********".to_string()));
        assert!(lines.contains(&"  project: mongodb-mongo-master".to_string()));
        assert!(lines.iter().all(|l| !l.contains("s3cr3t")));
    }

    #[test]
    fn table_without_credentials() {
        let lines = config_table(&Config::default());
        assert!(lines.contains(&"  credentials: (not set)".to_string()));
        assert!(lines.contains(&"  project: (not set)".to_string()));
    }
}
