//! Alias management commands
//!
//! Aliases name S3-compatible endpoints together with their credentials, so
//! that remote locations can be written as `alias/bucket/prefix`.

use clap::Subcommand;
use serde::Serialize;

use stls_core::{Alias, AliasManager, Error};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Alias subcommands for managing storage service connections
#[derive(Subcommand, Debug)]
pub enum AliasCommands {
    /// Add or update an alias
    Set(SetArgs),

    /// List all configured aliases
    List(ListArgs),

    /// Remove an alias
    Remove(RemoveArgs),
}

/// Arguments for the `alias set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Alias name (e.g., "local", "s3", "minio")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    #[arg(env = "STLS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// AWS region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto")]
    pub bucket_lookup: String,
}

impl SetArgs {
    fn into_alias(self) -> Alias {
        let mut alias = Alias::new(self.name, self.endpoint, self.access_key, self.secret_key);
        alias.region = self.region;
        alias.bucket_lookup = self.bucket_lookup;
        alias
    }
}

/// Arguments for the `alias list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details including region and lookup style
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `alias remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the alias to remove
    pub name: String,
}

/// JSON output for alias list
#[derive(Serialize)]
struct AliasListOutput {
    aliases: Vec<AliasInfo>,
}

/// Alias information for JSON output (without credentials)
#[derive(Serialize)]
struct AliasInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: String,
}

impl From<&Alias> for AliasInfo {
    fn from(alias: &Alias) -> Self {
        Self {
            name: alias.name.clone(),
            endpoint: alias.endpoint.clone(),
            region: alias.region.clone(),
            bucket_lookup: alias.bucket_lookup.clone(),
        }
    }
}

/// JSON output for alias set/remove operations
#[derive(Serialize)]
struct AliasOperationOutput {
    success: bool,
    alias: String,
    message: String,
}

/// Execute an alias subcommand
pub async fn execute(cmd: AliasCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let manager = match AliasManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    run(cmd, &manager, &formatter)
}

fn run(cmd: AliasCommands, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    match cmd {
        AliasCommands::Set(args) => execute_set(args, manager, formatter),
        AliasCommands::List(args) => execute_list(args, manager, formatter),
        AliasCommands::Remove(args) => execute_remove(args, manager, formatter),
    }
}

fn execute_set(args: SetArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    let name = args.name.clone();
    match manager.set(args.into_alias()) {
        Ok(()) => {
            report_operation(formatter, &name, format!("Alias '{name}' configured successfully"));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn execute_list(args: ListArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    let aliases = match manager.list() {
        Ok(aliases) => aliases,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    if formatter.is_json() {
        formatter.json(&AliasListOutput {
            aliases: aliases.iter().map(AliasInfo::from).collect(),
        });
    } else if aliases.is_empty() {
        formatter.println("No aliases configured.");
    } else {
        for alias in &aliases {
            if args.long {
                formatter.println(&format!(
                    "{:<12} {} (region: {}, lookup: {})",
                    alias.name, alias.endpoint, alias.region, alias.bucket_lookup
                ));
            } else {
                formatter.println(&format!("{:<12} {}", alias.name, alias.endpoint));
            }
        }
    }
    ExitCode::Success
}

fn execute_remove(args: RemoveArgs, manager: &AliasManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            report_operation(
                formatter,
                &args.name,
                format!("Alias '{}' removed successfully", args.name),
            );
            ExitCode::Success
        }
        Err(e @ Error::AliasNotFound(_)) => {
            formatter.error(&format!("Alias '{}' not found", args.name));
            ExitCode::from_error(&e)
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn report_operation(formatter: &Formatter, alias: &str, message: String) {
    if formatter.is_json() {
        formatter.json(&AliasOperationOutput {
            success: true,
            alias: alias.to_string(),
            message,
        });
    } else {
        formatter.success(&message);
    }
}
