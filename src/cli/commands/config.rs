use std::path::PathBuf;

use crate::cli::commands::CommandDefinition;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

const KEYS: &str = "currency_symbol, date_format, seed_sample_data, ui_color_enabled, data_dir";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View or change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <key> <value> (keys: {KEYS})"
                )));
            }
            let value = args[2..].join(" ");
            set_value(context, args[1], value.trim())?;
            context.persist_config()?;
            output::success(format!("`{}` updated.", args[1]));
            if args[1] == "data_dir" || args[1] == "seed_sample_data" {
                output::hint("Takes effect the next time Feebook starts.");
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  Config file      : {}", context.config_manager.config_path().display()));
    output::info(format!("  currency_symbol  : {}", config.currency_symbol));
    output::info(format!("  date_format      : {}", config.date_format));
    output::info(format!("  seed_sample_data : {}", config.seed_sample_data));
    output::info(format!("  ui_color_enabled : {}", config.ui_color_enabled));
    let data_dir = config.resolve_ledger_dir(context.base_dir());
    output::info(format!("  data_dir         : {}", data_dir.display()));
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = &mut context.config;
    match key {
        "currency_symbol" => config.currency_symbol = value.to_string(),
        "date_format" => {
            if value.is_empty() {
                return Err(CommandError::InvalidArguments("date_format cannot be empty".into()));
            }
            config.date_format = value.to_string();
        }
        "seed_sample_data" => config.seed_sample_data = parse_bool(key, value)?,
        "ui_color_enabled" => config.ui_color_enabled = parse_bool(key, value)?,
        "data_dir" => {
            config.data_dir = match value {
                "" | "default" => None,
                path => Some(PathBuf::from(path)),
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{other}` (keys: {KEYS})"
            )))
        }
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "{key} expects true or false, got `{value}`"
        ))),
    }
}
