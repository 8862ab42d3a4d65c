use crate::commands::print_json;
use crate::error::not_found;
use crate::util::{load_index, resolve_window};
use anyhow::Result;
use clap::Args;
use ringer_config::AppConfig;
use ringer_core::MatchedContact;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MatchArgs {
    pub address: String,
    /// vCard file to build the index from
    #[arg(long, value_name = "FILE")]
    pub contacts: PathBuf,
    /// Trailing digits compared for truncated numbers
    #[arg(long)]
    pub window: Option<i64>,
    /// Only accept exact keys, no digit or window fallback
    #[arg(long)]
    pub exact: bool,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    #[arg(long, value_name = "FILE")]
    pub contacts: PathBuf,
    #[arg(long)]
    pub window: Option<i64>,
}

#[derive(Debug, Serialize)]
struct MatchReport<'a> {
    address: &'a str,
    contact: Option<&'a MatchedContact>,
}

#[derive(Debug, Serialize)]
struct IndexEntry<'a> {
    key: &'a str,
    contact: &'a MatchedContact,
}

pub fn match_address(config: &AppConfig, json: bool, args: MatchArgs) -> Result<()> {
    let window = resolve_window(args.window, config)?;
    let index = load_index(&args.contacts, window)?;
    let matched = if args.exact {
        index.contact(&args.address)
    } else {
        index.resolve(&args.address)
    };

    if json {
        print_json(&MatchReport {
            address: &args.address,
            contact: matched.as_ref(),
        })?;
    } else if let Some(contact) = &matched {
        println!("{contact}");
    }

    match matched {
        Some(_) => Ok(()),
        None => Err(not_found(format!("no contact matches {}", args.address))),
    }
}

pub fn print_index(config: &AppConfig, json: bool, args: IndexArgs) -> Result<()> {
    let window = resolve_window(args.window, config)?;
    let index = load_index(&args.contacts, window)?;
    let mut entries: Vec<IndexEntry<'_>> = index
        .entries()
        .map(|(key, contact)| IndexEntry { key, contact })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(b.key));

    if json {
        return print_json(&entries);
    }

    for entry in entries {
        println!("{}\t{}", entry.key, entry.contact);
    }
    Ok(())
}
