use anyhow::Result;
use clap::Parser;
use nsite_content::Block;
use nsite_content::ContentService;
use nsite_content::Document;
use serde::Serialize;

use crate::commands::print_json;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Show {
    /// Slug of the document.
    slug: String,

    /// Include the materialized block tree.
    #[arg(long)]
    content: bool,
}

#[derive(Serialize)]
struct WithContent<'a> {
    #[serde(flatten)]
    document: &'a Document,
    content: Vec<Block>,
}

impl Command for Show {
    async fn execute(&self, service: &ContentService) -> Result<Exit> {
        let Some(document) = service.document_by_slug(&self.slug).await else {
            return Ok(Exit::error().with_message(format!(
                "No published document with slug \"{}\".",
                self.slug
            )));
        };

        if self.content {
            let content = service.materialize_content(&document.id).await;
            print_json(&WithContent {
                document: &document,
                content,
            })?;
        } else {
            print_json(&document)?;
        }
        Ok(Exit::success())
    }
}
