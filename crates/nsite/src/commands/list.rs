use anyhow::Result;
use clap::Parser;
use nsite_content::ContentService;

use crate::commands::print_json;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct List {
    /// Only documents flagged for the homepage.
    #[arg(long)]
    homepage: bool,
}

impl Command for List {
    async fn execute(&self, service: &ContentService) -> Result<Exit> {
        let mut documents = service.list_documents().await;
        if self.homepage {
            documents.retain(|document| document.show_on_homepage);
        }
        tracing::info!(count = documents.len(), "listed documents");
        print_json(&documents)?;
        Ok(Exit::success())
    }
}
