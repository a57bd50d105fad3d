//! API key validation command

use crate::app::TestKeyArgs;
use anyhow::Result;
use autokeywords_core::{Config, Database, KeywordService};

pub async fn run(args: TestKeyArgs, db: &Database, config: &Config) -> Result<()> {
    let service = KeywordService::from_config(db, config)?;
    service.test_api_key(args.key.as_deref()).await?;
    println!("API key is valid ({})", config.api.base_url);
    Ok(())
}
