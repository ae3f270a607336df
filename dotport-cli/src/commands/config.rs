//! `dotport config`: profiles and persisted settings.

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;

use crate::config::{CliConfig, Profile, Settings};
use crate::context::Context;
use crate::output::{print_field, print_section, OutputFormat};

#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print settings and profiles
    Show {
        /// Limit output to one profile
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Write a configuration value
    Set {
        /// Key: `token`, `api_url`, `profile.<name>.<field>`, or `settings.<name>`
        key: String,

        /// New value
        value: String,

        /// Profile that bare keys apply to
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Print a single configuration value
    Get {
        /// Key, using the same grammar as `set`
        key: String,

        /// Profile that bare keys apply to
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// List profiles, marking the default
    Profiles,

    /// Make a profile the default
    UseProfile {
        /// Name of an existing profile
        name: String,
    },

    /// Remove a profile
    DeleteProfile {
        /// Name of the profile to remove
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file location
    Path,

    /// Drop every profile and restore default settings
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show { profile } => show(ctx, profile.as_deref()),
        ConfigSubcommand::Set { key, value, profile } => {
            set(ctx, &key, &value, profile.as_deref())
        }
        ConfigSubcommand::Get { key, profile } => get(ctx, &key, profile.as_deref()),
        ConfigSubcommand::Profiles => list_profiles(ctx),
        ConfigSubcommand::UseProfile { name } => use_profile(ctx, &name),
        ConfigSubcommand::DeleteProfile { name, force } => delete_profile(ctx, &name, force),
        ConfigSubcommand::Path => show_path(),
        ConfigSubcommand::Reset { force } => reset(ctx, force),
    }
}

fn show(ctx: &Context, profile: Option<&str>) -> Result<()> {
    if let Some(name) = profile {
        let p = ctx
            .config
            .profiles
            .get(name)
            .with_context(|| format!("Profile '{}' not found", name))?;
        show_profile(name, p, ctx.config.default_profile.as_deref() == Some(name));
        return Ok(());
    }

    let settings = &ctx.config.settings;
    print_section("Settings");
    print_field("timeout_secs", &settings.timeout_secs.to_string());
    print_field("max_retries", &settings.max_retries.to_string());
    print_field("cache_ttl_secs", &settings.cache_ttl_secs.to_string());
    print_field("page_size", &settings.page_size.to_string());
    print_field("output_format", &settings.output_format);

    print_section("Profiles");
    if ctx.config.profiles.is_empty() {
        println!("  {}", "none configured".dimmed());
    }
    for (name, p) in &ctx.config.profiles {
        show_profile(
            name,
            p,
            ctx.config.default_profile.as_deref() == Some(name.as_str()),
        );
    }

    Ok(())
}

fn show_profile(name: &str, profile: &Profile, is_default: bool) {
    let marker = if is_default {
        " (default)".green().to_string()
    } else {
        String::new()
    };
    println!("\n  [{}]{}", name, marker);
    print_field("api_url", profile.api_url());
    print_field(
        "token",
        if profile.token.is_some() {
            "(set)"
        } else {
            "(not set)"
        },
    );
}

fn set(ctx: &Context, key: &str, value: &str, profile: Option<&str>) -> Result<()> {
    let mut config = ctx.config.clone();

    match key.split('.').collect::<Vec<_>>().as_slice() {
        ["settings", name] => set_setting(&mut config.settings, name, value)?,
        ["profile", name, field] => {
            set_profile_field(config.get_or_create_profile(name), field, value)?
        }
        [field @ ("api_url" | "token")] => {
            // Bare keys target the default profile, creating it on first use.
            let name = profile
                .or(config.default_profile.as_deref())
                .unwrap_or("default")
                .to_string();
            set_profile_field(config.get_or_create_profile(&name), field, value)?;
            if config.default_profile.is_none() {
                config.set_default_profile(&name);
            }
        }
        _ => bail!("Unknown configuration key: {}", key),
    }

    config.save().context("Failed to save configuration")?;
    if key.ends_with("token") {
        ctx.output.success(&format!("Set {}", key));
    } else {
        ctx.output.success(&format!("Set {} = {}", key, value));
    }

    Ok(())
}

fn set_setting(settings: &mut Settings, name: &str, value: &str) -> Result<()> {
    match name {
        "timeout_secs" => settings.timeout_secs = value.parse().context("Invalid number")?,
        "max_retries" => settings.max_retries = value.parse().context("Invalid number")?,
        "cache_ttl_secs" => settings.cache_ttl_secs = value.parse().context("Invalid number")?,
        "page_size" => settings.page_size = value.parse().context("Invalid number")?,
        "output_format" => {
            let Ok(format) = OutputFormat::from_str(value, true) else {
                bail!("Invalid output format: {} (table, json, yaml, compact)", value);
            };
            settings.output_format = format.to_string();
        }
        _ => bail!("Unknown setting: {}", name),
    }
    Ok(())
}

fn set_profile_field(profile: &mut Profile, field: &str, value: &str) -> Result<()> {
    match field {
        "api_url" => profile.api_url = Some(value.to_string()),
        "token" => profile.token = Some(value.to_string()),
        _ => bail!("Unknown profile field: {}", field),
    }
    Ok(())
}

fn get(ctx: &Context, key: &str, profile: Option<&str>) -> Result<()> {
    let value = match key.split('.').collect::<Vec<_>>().as_slice() {
        ["settings", name] => get_setting(&ctx.config.settings, name)?,
        ["profile", name, field] => {
            let p = ctx
                .config
                .profiles
                .get(*name)
                .with_context(|| format!("Profile '{}' not found", name))?;
            get_profile_field(p, field)?
        }
        [field @ ("api_url" | "token")] => {
            let p = ctx
                .config
                .get_profile(profile)
                .context("No profile configured")?;
            get_profile_field(p, field)?
        }
        ["default_profile"] => ctx
            .config
            .default_profile
            .clone()
            .unwrap_or_else(|| "not set".to_string()),
        _ => bail!("Unknown configuration key: {}", key),
    };

    println!("{}", value);
    Ok(())
}

fn get_setting(settings: &Settings, name: &str) -> Result<String> {
    Ok(match name {
        "timeout_secs" => settings.timeout_secs.to_string(),
        "max_retries" => settings.max_retries.to_string(),
        "cache_ttl_secs" => settings.cache_ttl_secs.to_string(),
        "page_size" => settings.page_size.to_string(),
        "output_format" => settings.output_format.clone(),
        _ => bail!("Unknown setting: {}", name),
    })
}

fn get_profile_field(profile: &Profile, field: &str) -> Result<String> {
    Ok(match field {
        "api_url" => profile.api_url().to_string(),
        "token" => profile.token.clone().unwrap_or_default(),
        _ => bail!("Unknown profile field: {}", field),
    })
}

fn list_profiles(ctx: &Context) -> Result<()> {
    if ctx.config.profiles.is_empty() {
        ctx.output
            .info("No profiles configured. Run 'dotport config set api_url <url>' to create one.");
        return Ok(());
    }

    for name in ctx.config.profiles.keys() {
        if ctx.config.default_profile.as_deref() == Some(name.as_str()) {
            println!("{} {}", "→".green(), name.green().bold());
        } else {
            println!("  {}", name);
        }
    }

    Ok(())
}

fn use_profile(ctx: &Context, name: &str) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!(
            "Profile '{}' not found. Run 'dotport config profiles' to list available profiles.",
            name
        );
    }

    config.set_default_profile(name);
    config.save().context("Failed to save configuration")?;

    ctx.output
        .success(&format!("Default profile is now '{}'", name));
    Ok(())
}

fn delete_profile(ctx: &Context, name: &str, force: bool) -> Result<()> {
    let mut config = ctx.config.clone();

    if !config.profiles.contains_key(name) {
        bail!("Profile '{}' not found", name);
    }
    if !force && !confirmed(ctx, &format!("Delete profile '{}'?", name))? {
        return Ok(());
    }

    config.profiles.remove(name);
    if config.default_profile.as_deref() == Some(name) {
        config.default_profile = None;
    }
    config.save().context("Failed to save configuration")?;

    ctx.output.success(&format!("Removed profile '{}'", name));
    Ok(())
}

fn show_path() -> Result<()> {
    let path = CliConfig::config_path()?;
    let status = if path.exists() {
        "✓".green()
    } else {
        "✗".red()
    };
    println!("{} {}", status, path.display());
    Ok(())
}

fn reset(ctx: &Context, force: bool) -> Result<()> {
    if !force && !confirmed(ctx, "Reset all configuration to defaults? This cannot be undone.")? {
        return Ok(());
    }

    CliConfig::default()
        .save()
        .context("Failed to save configuration")?;

    ctx.output.success("Configuration reset to defaults");
    Ok(())
}

/// Prompt before a destructive step; prints `Cancelled` on decline.
fn confirmed(ctx: &Context, prompt: &str) -> Result<bool> {
    let yes = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to get confirmation")?;

    if !yes {
        ctx.output.info("Cancelled");
    }
    Ok(yes)
}
