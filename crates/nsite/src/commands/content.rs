use anyhow::Result;
use clap::Parser;
use nsite_content::ContentService;

use crate::commands::print_json;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Content {
    /// Page (or any block) whose children to materialize.
    page_id: String,
}

impl Command for Content {
    async fn execute(&self, service: &ContentService) -> Result<Exit> {
        let blocks = service.materialize_content(&self.page_id).await;
        tracing::info!(page_id = %self.page_id, count = blocks.len(), "materialized content");
        print_json(&blocks)?;
        Ok(Exit::success())
    }
}
