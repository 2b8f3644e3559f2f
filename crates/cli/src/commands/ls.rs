//! ls command - List local directories, buckets and objects
//!
//! Entry keys are printed relative to the queried location. Entries that
//! cannot be listed are reported and skipped; only a location that cannot be
//! resolved at all fails the command.

use anyhow::Context;
use clap::Args;
use jiff::tz::TimeZone;
use tokio_util::sync::CancellationToken;

use stls_core::{
    Config, ConfigManager, Error, ListOptions, ListingDriver, ListingSummary, LocalFs, ParsedPath,
    RecordFormatter, parse_path,
};
use stls_s3::S3Client;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, Printer};

/// List a directory, bucket or prefix
#[derive(Args, Debug)]
pub struct LsArgs {
    /// Local path, or remote path (alias/, alias/bucket[/prefix])
    pub path: String,

    /// List recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// List incomplete uploads instead of objects
    #[arg(short = 'I', long)]
    pub incomplete: bool,

    /// Print totals after the listing
    #[arg(long)]
    pub summarize: bool,
}

impl LsArgs {
    fn options(&self) -> ListOptions {
        ListOptions {
            recursive: self.recursive,
            include_incomplete: self.incomplete,
        }
    }
}

/// Execute the ls command
pub async fn execute(args: LsArgs, output_config: OutputConfig) -> ExitCode {
    let config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };
    let output_config = output_config.with_defaults(&config.defaults);
    let formatter = Formatter::new(output_config.clone());

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let mut printer = Printer::stdout(output_config);
    let result = list(&args, &config, cancel, &mut printer).await;
    interrupt.abort();

    match result {
        Ok(summary) if summary.cancelled => {
            formatter.warning("Listing interrupted");
            ExitCode::Interrupted
        }
        Ok(summary) => {
            if args.summarize {
                printer.summary(&summary);
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            e.downcast_ref::<Error>()
                .map(ExitCode::from_error)
                .unwrap_or(ExitCode::GeneralError)
        }
    }
}

async fn list(
    args: &LsArgs,
    config: &Config,
    cancel: CancellationToken,
    printer: &mut Printer,
) -> anyhow::Result<ListingSummary> {
    let style = config.defaults.separator_style()?;
    let driver = ListingDriver::new(RecordFormatter::new(style, TimeZone::system()))
        .with_cancellation(cancel);

    let location = parse_path(&args.path, |name| {
        config.aliases.iter().any(|alias| alias.name == name)
    })?;

    let summary = match location {
        ParsedPath::Local(path) => {
            let fs = LocalFs::new(&path);
            driver
                .run(&path, &fs, &fs, args.options(), printer)
                .await?
        }
        ParsedPath::Remote(target) => {
            let alias = config
                .aliases
                .iter()
                .find(|alias| alias.name == target.alias)
                .cloned()
                .ok_or_else(|| Error::AliasNotFound(target.alias.clone()))?;
            let client = S3Client::new(alias)
                .await
                .context("Failed to create S3 client")?;
            let listing = client.listing(target);
            driver
                .run(&args.path, &client, &listing, args.options(), printer)
                .await?
        }
    };

    Ok(summary)
}
