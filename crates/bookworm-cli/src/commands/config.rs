//! Config commands
//!
//! Shows the effective client configuration and where each value came
//! from. The file is edited by hand; environment variables and flags
//! override it.

use anyhow::Result;
use bookworm_core::config::{
    config_file_path, ENV_API_URL, ENV_API_VERSION, ENV_SESSION_PATH, ENV_TIMEOUT_SECS,
};
use bookworm_core::{LoadedConfig, Session};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{print_error, print_info, print_output};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Print the config file location
    Path,
}

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show_config(ctx),
        ConfigAction::Get { key } => get_config(ctx, key),
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let rows = config_rows(&ctx.config, ctx.client.session().current().as_ref())?;
    print_output(&rows, ctx.format)
}

fn get_config(ctx: &Context, key: String) -> Result<()> {
    let rows = config_rows(&ctx.config, ctx.client.session().current().as_ref())?;

    if let Some(row) = rows.iter().find(|r| r.key.eq_ignore_ascii_case(&key)) {
        print_info(&format!("{} = {}", row.key, row.value), ctx.quiet);
    } else {
        print_error(&format!("Config key not found: {}", key));
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        print_info(&format!("Available keys: {}", keys.join(", ")), ctx.quiet);
    }

    Ok(())
}

fn config_rows(loaded: &LoadedConfig, session: Option<&Session>) -> Result<Vec<ConfigRow>> {
    let config = &loaded.config;
    let session_path = config.resolved_session_path()?;

    Ok(vec![
        ConfigRow {
            key: "api_url".to_string(),
            value: config.api_url.clone(),
            source: source_label(loaded.api_url_source.to_string(), ENV_API_URL),
        },
        ConfigRow {
            key: "api_version".to_string(),
            value: config.api_version.clone(),
            source: source_label(loaded.api_version_source.to_string(), ENV_API_VERSION),
        },
        ConfigRow {
            key: "base_url".to_string(),
            value: config.base_url(),
            source: "derived".to_string(),
        },
        ConfigRow {
            key: "timeout_secs".to_string(),
            value: config.timeout_secs.to_string(),
            source: source_label(loaded.timeout_source.to_string(), ENV_TIMEOUT_SECS),
        },
        ConfigRow {
            key: "session_path".to_string(),
            value: session_path.display().to_string(),
            source: source_label(loaded.session_path_source.to_string(), ENV_SESSION_PATH),
        },
        ConfigRow {
            key: "access_token".to_string(),
            value: mask_token(session.map(|s| s.access_token.as_str())),
            source: "session".to_string(),
        },
    ])
}

/// "env" becomes "env (NAME)" so the user knows which variable to unset
fn source_label(source: String, env_name: &str) -> String {
    if source == "env" {
        format!("env ({})", env_name)
    } else {
        source
    }
}

fn mask_token(token: Option<&str>) -> String {
    match token {
        Some(t) if !t.is_empty() => "****".to_string(),
        _ => "-".to_string(),
    }
}
