use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{format_record_date, load_index, now_utc, parse_record_date, resolve_window};
use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Subcommand};
use ringer_core::{CallAddress, CallHistory, CallRecord, ContactMatchingIndex, MatchedContact};
use ringer_store::PropertyListStorage;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Record a call
    Add(AddRecordArgs),
    /// Show recorded calls, oldest first
    List(ListRecordsArgs),
    /// Remove the call at a 1-based position
    Rm(RemoveRecordArgs),
    /// Remove every call and the stored history
    Clear,
}

#[derive(Debug, Args)]
pub struct AddRecordArgs {
    /// Remote party as user@host, or a bare number
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub date: Option<String>,
    /// Call length in seconds
    #[arg(long, default_value_t = 0)]
    pub duration: i64,
    #[arg(long, action = ArgAction::SetTrue)]
    pub incoming: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pub missed: bool,
}

#[derive(Debug, Args)]
pub struct ListRecordsArgs {
    /// vCard file used to name the remote party of each call
    #[arg(long, value_name = "FILE")]
    pub contacts: Option<PathBuf>,
    #[arg(long, requires = "contacts")]
    pub window: Option<i64>,
}

#[derive(Debug, Args)]
pub struct RemoveRecordArgs {
    pub position: usize,
}

#[derive(Debug, Serialize)]
struct HistoryEntry<'a> {
    position: usize,
    #[serde(flatten)]
    record: &'a CallRecord,
    contact: Option<MatchedContact>,
}

pub fn add_record(ctx: &Context<'_>, args: AddRecordArgs) -> Result<()> {
    if args.duration < 0 {
        return Err(invalid_input("duration cannot be negative"));
    }
    let address = CallAddress::parse(&args.address)?;
    let date = match args.date {
        Some(raw) => parse_record_date(&raw)?,
        None => now_utc(),
    };
    let record = CallRecord {
        address,
        date,
        duration: args.duration,
        incoming: args.incoming,
        missed: args.missed,
    };

    let mut history = ctx.store.call_history(&ctx.config.history.list);
    history.add(record.clone());
    confirm_stored(ctx, &history)?;

    if ctx.json {
        print_json(&record)?;
    } else {
        println!("recorded call with {}", record.address);
    }
    Ok(())
}

pub fn list_records(ctx: &Context<'_>, args: ListRecordsArgs) -> Result<()> {
    let index = match &args.contacts {
        Some(path) => Some(load_index(path, resolve_window(args.window, ctx.config)?)?),
        None => None,
    };

    let history = ctx.store.call_history(&ctx.config.history.list);
    let entries: Vec<HistoryEntry<'_>> = history
        .all_records()
        .iter()
        .enumerate()
        .map(|(offset, record)| HistoryEntry {
            position: offset + 1,
            record,
            contact: index.as_ref().and_then(|index| match_record(index, record)),
        })
        .collect();

    if ctx.json {
        return print_json(&entries);
    }

    for entry in &entries {
        let record = entry.record;
        let direction = match (record.incoming, record.missed) {
            (true, true) => "missed",
            (true, false) => "in",
            (false, _) => "out",
        };
        let party = match &entry.contact {
            Some(contact) => contact.to_string(),
            None => record.address.to_string(),
        };
        println!(
            "{:>3}  {}  {:<6} {:>5}s  {}",
            entry.position,
            format_record_date(&record.date),
            direction,
            record.duration,
            party
        );
    }
    Ok(())
}

pub fn remove_record(ctx: &Context<'_>, args: RemoveRecordArgs) -> Result<()> {
    let mut history = ctx.store.call_history(&ctx.config.history.list);
    let record = args
        .position
        .checked_sub(1)
        .and_then(|offset| history.all_records().get(offset))
        .cloned()
        .ok_or_else(|| not_found(format!("no call at position {}", args.position)))?;
    history.remove(&record);
    confirm_stored(ctx, &history)?;

    if ctx.json {
        print_json(&record)?;
    } else {
        println!("removed call with {}", record.address);
    }
    Ok(())
}

pub fn clear_records(ctx: &Context<'_>) -> Result<()> {
    let mut history = ctx.store.call_history(&ctx.config.history.list);
    let count = history.all_records().len();
    history.remove_all();
    let list = &ctx.config.history.list;
    if ctx.store.property_list(list).exists()? {
        return Err(anyhow!("stored call history {list} could not be cleared"));
    }

    if ctx.json {
        print_json(&serde_json::json!({ "removed": count }))?;
    } else {
        println!("removed {count} calls");
    }
    Ok(())
}

/// Storage failures are only logged by the history itself.
fn confirm_stored(ctx: &Context<'_>, history: &impl CallHistory) -> Result<()> {
    let list = &ctx.config.history.list;
    match ctx.store.property_list(list).load() {
        Ok(items) if items.len() == history.all_records().len() => Ok(()),
        _ => Err(anyhow!("call history could not be saved to list {list}")),
    }
}

fn match_record(index: &ContactMatchingIndex, record: &CallRecord) -> Option<MatchedContact> {
    record
        .address
        .lookup_candidates()
        .iter()
        .find_map(|candidate| index.resolve(candidate))
}
