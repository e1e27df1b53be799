//! fontprefs CLI: font catalog and preference commands.
//!
//! Commands:
//! - `fonts`: list installed font families
//! - `encodings`: list the selectable default encodings
//! - `prefs`: show every font preference with its source
//! - `set`: write one preference to the preferences file
//! - `snap`: show which permitted font size a value snaps to

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

use fontprefs_core::catalog::{self, FontCatalog};
use fontprefs_core::config::{self, AppConfig};
use fontprefs_core::{
    Policy, PrefValue, PreferenceBinding, PreferenceStore, SystemFontCatalog, ValueMap,
};

#[derive(Parser)]
#[command(name = "fontprefs", about = "fontprefs CLI: fonts and encoding preferences", version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file. Defaults to <config dir>/fontprefs/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed font families.
    Fonts {
        /// Only families whose name contains this text (case-insensitive).
        #[arg(long)]
        filter: Option<String>,

        /// Only families with a monospaced face.
        #[arg(long, default_value_t = false)]
        monospace: bool,
    },
    /// List the selectable default encodings.
    Encodings,
    /// Show every font preference, its value and where it comes from.
    Prefs {
        /// Preferences JSON file.
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Policy TOML file.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Set a preference and save the preferences file.
    Set {
        /// Preference key, e.g. webkit.webprefs.default_font_size.
        key: String,

        /// New value. Parsed as an integer for integer preferences.
        value: String,

        /// Preferences JSON file.
        #[arg(long)]
        prefs: Option<PathBuf>,

        /// Policy TOML file.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Show the permitted font size a value snaps to.
    Snap {
        value: f64,

        /// Use the minimum font size list instead of the default one.
        #[arg(long, default_value_t = false)]
        minimum: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_dir = config::config_dir();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let app_config = AppConfig::load(&config_path)?;
    debug!("config from {}", config_path.display());

    match cli.command {
        Commands::Fonts { filter, monospace } => run_fonts(filter.as_deref(), monospace),
        Commands::Encodings => {
            for option in catalog::encodings() {
                println!("{:<16} {}", option.value, option.label);
            }
            Ok(())
        }
        Commands::Prefs { prefs, policy } => {
            let prefs = prefs.unwrap_or_else(|| app_config.prefs_path(&config_dir));
            let policy = policy.unwrap_or_else(|| app_config.policy_path(&config_dir));
            run_prefs(&prefs, &policy)
        }
        Commands::Set {
            key,
            value,
            prefs,
            policy,
        } => {
            let prefs = prefs.unwrap_or_else(|| app_config.prefs_path(&config_dir));
            let policy = policy.unwrap_or_else(|| app_config.policy_path(&config_dir));
            let stored = set_pref(&prefs, &policy, &key, &value)?;
            println!("{key} = {stored}");
            Ok(())
        }
        Commands::Snap { value, minimum } => {
            println!("{}", snap(value, minimum)?);
            Ok(())
        }
    }
}

fn run_fonts(filter: Option<&str>, monospace: bool) -> Result<()> {
    let catalog = SystemFontCatalog {
        monospace_only: monospace,
    };
    let families = catalog.font_families()?;
    let needle = filter.map(str::to_lowercase);
    let mut shown = 0usize;
    for family in &families {
        if let Some(needle) = &needle {
            if !family.value.to_lowercase().contains(needle) {
                continue;
            }
        }
        println!("{}", family.label);
        shown += 1;
    }
    info!("{shown} of {} families shown", families.len());
    Ok(())
}

/// Store as the page would see it: defaults, saved values, policy.
fn open_store(prefs_path: &Path, policy_path: &Path) -> Result<PreferenceStore> {
    let mut store = PreferenceStore::with_font_defaults();
    store
        .load_user_file(prefs_path)
        .with_context(|| format!("reading {}", prefs_path.display()))?;
    Policy::load(policy_path)?.apply(&mut store);
    Ok(store)
}

fn run_prefs(prefs_path: &Path, policy_path: &Path) -> Result<()> {
    let store = open_store(prefs_path, policy_path)?;
    for entry in store.entries() {
        println!(
            "{:<44} {:<24} [{}]",
            entry.key.as_str(),
            entry.value.to_string(),
            entry.source.label()
        );
    }
    Ok(())
}

/// Parse `raw` with the type of `key`'s default.
fn parse_value(store: &PreferenceStore, key: &str, raw: &str) -> Result<PrefValue> {
    match store.default_value(key) {
        Some(PrefValue::Integer(_)) => {
            let n = raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("{key} expects an integer, got {raw:?}"))?;
            Ok(PrefValue::Integer(n))
        }
        Some(PrefValue::String(_)) => Ok(PrefValue::String(raw.to_string())),
        None => bail!("unknown preference '{key}'"),
    }
}

fn set_pref(prefs_path: &Path, policy_path: &Path, key: &str, raw: &str) -> Result<PrefValue> {
    let mut store = open_store(prefs_path, policy_path)?;
    let value = parse_value(&store, key, raw)?;
    match &value {
        PrefValue::Integer(n) => store.set_integer_pref(key, *n, "cli")?,
        PrefValue::String(s) => store.set_string_pref(key, s, "cli")?,
    }
    if let Some(effective) = store.get(key).filter(|v| *v != value) {
        warn!("{key} is now {effective}, not {value}");
    }
    store
        .save_user_file(prefs_path)
        .with_context(|| format!("writing {}", prefs_path.display()))?;
    Ok(value)
}

fn snap(value: f64, minimum: bool) -> Result<String> {
    if !value.is_finite() {
        bail!("{value} is not a size");
    }
    let map = if minimum {
        ValueMap::minimum_font_sizes()
    } else {
        ValueMap::font_sizes()
    };
    Ok(format!("{value} -> {}pt", map.nearest(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fontprefs_core::keys;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["fontprefs", "-vv", "encodings"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn snap_rounds_to_permitted_sizes() {
        assert_eq!(snap(19.4, false).unwrap(), "19.4 -> 20pt");
        assert_eq!(snap(19.0, false).unwrap(), "19 -> 18pt");
        assert_eq!(snap(100.0, true).unwrap(), "100 -> 24pt");
        assert!(snap(f64::NAN, false).is_err());
    }

    #[test]
    fn parse_value_follows_default_type() {
        let store = PreferenceStore::with_font_defaults();
        assert_eq!(
            parse_value(&store, keys::DEFAULT_FONT_SIZE, " 18 ").unwrap(),
            PrefValue::Integer(18)
        );
        assert!(parse_value(&store, keys::DEFAULT_FONT_SIZE, "large").is_err());
        assert_eq!(
            parse_value(&store, keys::SERIF_FONT_FAMILY, "Georgia").unwrap(),
            PrefValue::String("Georgia".into())
        );
        assert!(parse_value(&store, "webkit.webprefs.nope", "1").is_err());
    }

    #[test]
    fn set_writes_preferences_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("Preferences.json");
        let policy = dir.path().join("policy.toml");

        set_pref(&prefs, &policy, keys::DEFAULT_FONT_SIZE, "20").unwrap();
        let store = open_store(&prefs, &policy).unwrap();
        assert_eq!(store.get_integer(keys::DEFAULT_FONT_SIZE), Some(20));
    }

    #[test]
    fn set_refuses_managed_key() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = dir.path().join("Preferences.json");
        let policy = dir.path().join("policy.toml");
        std::fs::write(
            &policy,
            "[managed]\n\"webkit.webprefs.fixed_font_family\" = \"Consolas\"\n",
        )
        .unwrap();

        assert!(set_pref(&prefs, &policy, keys::FIXED_FONT_FAMILY, "Courier New").is_err());
        assert!(!prefs.exists());
    }
}
