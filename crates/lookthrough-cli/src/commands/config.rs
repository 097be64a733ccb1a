//! Config command implementation.
//!
//! Manages persisted defaults. Command-line flags override stored values,
//! which override built-in defaults.

use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_success, print_warning, KeyValue};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "LOOKTHROUGH_CONFIG";

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Holdings store directory
    DbDir,
    /// Skip short positions
    IgnoreShorts,
    /// Allowed deviation of fund fractions from 1
    FractionTolerance,
    /// Parse holdings files in parallel
    Parallel,
    /// Default output format
    DefaultFormat,
    /// Summary rows to print
    Head,
}

impl ConfigKey {
    fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dbdir" | "db" => Some(Self::DbDir),
            "ignore_shorts" | "shorts" => Some(Self::IgnoreShorts),
            "fraction_tolerance" | "tolerance" => Some(Self::FractionTolerance),
            "parallel" => Some(Self::Parallel),
            "default_format" | "format" => Some(Self::DefaultFormat),
            "head" => Some(Self::Head),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::DbDir => "dbdir",
            Self::IgnoreShorts => "ignore_shorts",
            Self::FractionTolerance => "fraction_tolerance",
            Self::Parallel => "parallel",
            Self::DefaultFormat => "default_format",
            Self::Head => "head",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::DbDir => "Holdings store directory",
            Self::IgnoreShorts => "Skip short positions (true, false)",
            Self::FractionTolerance => "Warn when fund fractions sum this far from 1 (0 to 1)",
            Self::Parallel => "Parse holdings files in parallel (true, false)",
            Self::DefaultFormat => "Default output format (table, json, csv)",
            Self::Head => "Summary rows to print, 0 for all",
        }
    }

    fn default_value(&self) -> &'static str {
        match self {
            Self::DbDir => "",
            Self::IgnoreShorts => "false",
            Self::FractionTolerance => "0.02",
            Self::Parallel => "true",
            Self::DefaultFormat => "table",
            Self::Head => "0",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DbDir,
            Self::IgnoreShorts,
            Self::FractionTolerance,
            Self::Parallel,
            Self::DefaultFormat,
            Self::Head,
        ]
    }
}

/// Simple config storage.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Config {
    fn load() -> Result<Self> {
        let path = config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&content)
                .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    fn value(&self, key: ConfigKey) -> &str {
        self.values
            .get(key.as_str())
            .map_or(key.default_value(), String::as_str)
    }

    fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| CliError::Config("could not determine config directory".to_string()))?;
    Ok(home.join("lookthrough").join("config.json"))
}

/// Stored defaults, parsed.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Holdings store directory, if configured.
    pub dbdir: Option<PathBuf>,
    /// Skip short positions.
    pub ignore_shorts: bool,
    /// Fraction sum tolerance.
    pub fraction_tolerance: Decimal,
    /// Parallel parsing.
    pub parallel: bool,
    /// Output format when no flag is given.
    pub format: OutputFormat,
    /// Summary rows to print; `None` prints all.
    pub head: Option<usize>,
}

impl Settings {
    /// Loads stored settings over built-in defaults.
    pub fn load() -> Result<Self> {
        Ok(Self::from_config(&Config::load()?)?)
    }

    fn from_config(config: &Config) -> CliResult<Self> {
        let dbdir = config.value(ConfigKey::DbDir);
        let head = parse_head(config.value(ConfigKey::Head))?;
        Ok(Self {
            dbdir: (!dbdir.is_empty()).then(|| PathBuf::from(dbdir)),
            ignore_shorts: parse_bool(
                ConfigKey::IgnoreShorts,
                config.value(ConfigKey::IgnoreShorts),
            )?,
            fraction_tolerance: parse_tolerance(config.value(ConfigKey::FractionTolerance))?,
            parallel: parse_bool(ConfigKey::Parallel, config.value(ConfigKey::Parallel))?,
            format: parse_format(config.value(ConfigKey::DefaultFormat))?,
            head: (head > 0).then_some(head),
        })
    }
}

fn invalid(key: ConfigKey, value: &str, hint: &'static str) -> CliError {
    CliError::InvalidValue {
        key: key.as_str(),
        value: value.to_string(),
        hint,
    }
}

fn parse_bool(key: ConfigKey, value: &str) -> CliResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value, "Use true or false.")),
    }
}

fn parse_tolerance(value: &str) -> CliResult<Decimal> {
    let hint = "Must be a number between 0 and 1.";
    let tolerance = Decimal::from_str(value)
        .map_err(|_| invalid(ConfigKey::FractionTolerance, value, hint))?;
    if tolerance.is_sign_negative() || tolerance > Decimal::ONE {
        return Err(invalid(ConfigKey::FractionTolerance, value, hint));
    }
    Ok(tolerance)
}

fn parse_format(value: &str) -> CliResult<OutputFormat> {
    OutputFormat::from_name(value)
        .ok_or_else(|| invalid(ConfigKey::DefaultFormat, value, "Use table, json, or csv."))
}

fn parse_head(value: &str) -> CliResult<usize> {
    value
        .parse()
        .map_err(|_| invalid(ConfigKey::Head, value, "Must be a non-negative number."))
}

/// Validate a configuration value.
fn validate_config_value(key: ConfigKey, value: &str) -> CliResult<()> {
    match key {
        ConfigKey::DbDir => {
            if value.trim().is_empty() {
                return Err(invalid(key, value, "Must be a directory path."));
            }
        }
        ConfigKey::IgnoreShorts | ConfigKey::Parallel => {
            parse_bool(key, value)?;
        }
        ConfigKey::FractionTolerance => {
            parse_tolerance(value)?;
        }
        ConfigKey::DefaultFormat => {
            parse_format(value)?;
        }
        ConfigKey::Head => {
            parse_head(value)?;
        }
    }
    Ok(())
}

fn lookup_key(name: &str) -> CliResult<ConfigKey> {
    ConfigKey::from_name(name).ok_or_else(|| CliError::UnknownKey(name.to_string()))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(format),
        ConfigCommand::Get(get_args) => execute_get(get_args, format),
        ConfigCommand::Set(set_args) => execute_set(set_args),
        ConfigCommand::List => execute_list(format),
        ConfigCommand::Reset(reset_args) => execute_reset(reset_args),
        ConfigCommand::Path => execute_path(),
    }
}

/// Show current configuration.
fn execute_show(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    match format {
        OutputFormat::Table => {
            let results: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| KeyValue::new(key.as_str(), config.value(*key)))
                .collect();
            print_header("Current Configuration");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: BTreeMap<_, _> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), config.value(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            let results: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| KeyValue::new(key.as_str(), config.value(*key)))
                .collect();
            crate::output::print_output(&results, format)?;
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(args: GetArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let key = lookup_key(&args.key)?;
    let value = config.value(key);

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}", value);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(args: SetArgs) -> Result<()> {
    let key = lookup_key(&args.key)?;
    validate_config_value(key, &args.value)?;

    let mut config = Config::load()?;
    config.set(key.as_str().to_string(), args.value.clone());
    config.save()?;

    print_success(&format!("Set {} = {}", key.as_str(), args.value));
    Ok(())
}

/// List available configuration keys.
fn execute_list(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let results: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    KeyValue::new(
                        key.as_str(),
                        format!("{} (default: {:?})", key.description(), key.default_value()),
                    )
                })
                .collect();
            print_header("Available Configuration Keys");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["key", "description", "default"])?;
            for key in ConfigKey::all() {
                wtr.write_record([key.as_str(), key.description(), key.default_value()])?;
            }
            wtr.flush()?;
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(args: ResetArgs) -> Result<()> {
    if args.all {
        Config::default().save()?;
        print_success("Reset all configuration to defaults");
    } else if let Some(key_str) = args.key {
        let key = lookup_key(&key_str)?;
        let mut config = Config::load()?;
        config.remove(key.as_str());
        config.save()?;
        print_success(&format!(
            "Reset {} to default ({:?})",
            key.as_str(),
            key.default_value()
        ));
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path() -> Result<()> {
    let path = config_path()?;
    println!("{}", path.display());
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}
