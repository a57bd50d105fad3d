//! Bulk generation and tag registration

use crate::app::{BulkAction, BulkArgs, OutputFormat};
use crate::output::{print_json, terminal};
use crate::progress::ProgressReporter;
use anyhow::Result;
use autokeywords_core::{
    register_tags_bulk, select_items, BulkReport, BulkRunner, Config, Database, KeywordService,
};
use std::time::Duration;

pub async fn run(
    args: BulkArgs,
    db: &Database,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let report = match args.action {
        BulkAction::Generate {
            ids,
            types,
            delay_ms,
        } => {
            let item_ids = select_items(db, &ids, &types)?;
            if item_ids.is_empty() {
                println!("No items to process");
                return Ok(());
            }

            let service = KeywordService::from_config(db, config)?;
            let delay = Duration::from_millis(delay_ms.unwrap_or(config.bulk_delay_ms));
            let runner = BulkRunner::new(&service, delay);

            let mut progress = ProgressReporter::new(item_ids.len());
            progress.set_message("Generating keywords");
            let report = runner
                .generate(&item_ids, |_, item| {
                    progress.record(item.success);
                    progress.set_message(&format!("item #{}", item.item_id));
                })
                .await;
            progress.finish();
            report
        }
        BulkAction::Tags { ids, types } => {
            let item_ids = select_items(db, &ids, &types)?;
            if item_ids.is_empty() {
                println!("No items to process");
                return Ok(());
            }
            register_tags_bulk(db, &item_ids, |_, _| {})
        }
    };

    print_report(&report, format)
}

fn print_report(report: &BulkReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Cli => {
            for item in &report.items {
                println!("{}", terminal::format_bulk_item(item));
            }
            println!(
                "{} succeeded, {} failed",
                report.succeeded(),
                report.failed()
            );
        }
    }
    Ok(())
}
