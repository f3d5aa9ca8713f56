//! CLI entry commands — add, list, sort, search and delete through the
//! journal's intent dispatch.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;

use brewlog::config::BrewlogConfig;
use brewlog::journal::types::{parse_price, parse_rating};
use brewlog::journal::{photo, EntryId, EntryInput, Intent, Journal, SortCriterion};

use super::{open_store, TerminalSink};

/// Raw form values as typed on the command line.
#[derive(Debug)]
pub struct AddForm {
    pub name: String,
    pub address: String,
    pub order: String,
    pub price: String,
    pub rating: String,
    pub review: String,
    pub photo: Option<PathBuf>,
}

impl AddForm {
    async fn into_input(self) -> Result<EntryInput> {
        let photo = photo::encode_optional(self.photo.as_deref()).await?;
        Ok(EntryInput::new(self.name)
            .address(self.address)
            .order(self.order)
            .price(parse_price(&self.price))
            .rating(parse_rating(&self.rating))
            .review(self.review)
            .photo(photo))
    }
}

async fn journal(config: &BrewlogConfig) -> Result<Journal> {
    Ok(Journal::new(open_store(config).await?))
}

pub async fn add(config: &BrewlogConfig, form: AddForm) -> Result<()> {
    let input = form.into_input().await?;
    let journal = journal(config).await?;
    journal
        .dispatch(Intent::AddRequested(input), &mut TerminalSink::default())
        .await?;
    Ok(())
}

pub async fn list(config: &BrewlogConfig) -> Result<()> {
    let journal = journal(config).await?;
    journal.refresh(&mut TerminalSink::default()).await?;
    Ok(())
}

pub async fn sort(config: &BrewlogConfig, by: SortCriterion) -> Result<()> {
    let journal = journal(config).await?;
    journal
        .dispatch(Intent::SortRequested(by), &mut TerminalSink::default())
        .await?;
    Ok(())
}

pub async fn search(config: &BrewlogConfig, query: String) -> Result<()> {
    let journal = journal(config).await?;
    journal
        .dispatch(Intent::SearchRequested(query), &mut TerminalSink::default())
        .await?;
    Ok(())
}

/// Request deletion, confirm on the terminal unless `yes`, then delete.
pub async fn delete(config: &BrewlogConfig, id: EntryId, yes: bool) -> Result<()> {
    let journal = journal(config).await?;
    let mut sink = TerminalSink::default();

    journal.dispatch(Intent::DeleteRequested(id), &mut sink).await?;
    let Some(pending) = sink.pending_delete else {
        return Ok(());
    };

    if !yes && !prompt_confirm(pending)? {
        println!("Delete cancelled.");
        return Ok(());
    }

    journal
        .dispatch(Intent::DeleteConfirmed(pending), &mut sink)
        .await?;
    Ok(())
}

fn prompt_confirm(id: EntryId) -> Result<bool> {
    print!("Delete entry #{id}? [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes" | "YES"))
}
