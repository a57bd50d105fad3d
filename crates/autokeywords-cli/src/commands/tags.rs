//! Tag registration command

use crate::app::{OutputFormat, TagsArgs};
use crate::output::print_json;
use anyhow::Result;
use autokeywords_core::{register_tags, Database};

pub async fn run(args: TagsArgs, db: &Database, format: OutputFormat) -> Result<()> {
    let registration = register_tags(db, args.id)?;
    match format {
        OutputFormat::Json => print_json(&registration)?,
        OutputFormat::Cli => {
            println!(
                "Registered {} tags on item #{} ({} new)",
                registration.tags.len(),
                registration.item_id,
                registration.added
            );
            println!("{}", registration.tags.join(", "));
        }
    }
    Ok(())
}
