//! Catalog command handlers
//!
//! `lookup list` reads any catalog; `sector` and `role` manage the two
//! catalogs administrators can edit.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use digesto_core::auth::View;
use digesto_core::domain::lookup::{Lookup, LookupKind};
use digesto_core::dto::lookup::LookupRequest;
use digesto_core::notice::Notice;

use super::{ListArgs, print_notice, print_page_footer};
use crate::context::Context;
use crate::id_resolver::resolve_lookup;

/// Read-only catalog subcommands
#[derive(Subcommand)]
pub enum LookupCommands {
    /// List a catalog (types, statuses, sectors, roles, keywords, ...)
    List {
        /// Catalog to list
        kind: LookupKind,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// Managed catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List entries
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create an entry
    Create {
        /// Entry name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Rename an entry
    Rename {
        /// Entry id or name
        entry: String,

        /// New name
        name: String,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete an entry
    Delete {
        /// Entry id or name
        entry: String,

        /// Confirm the operation
        #[arg(long)]
        yes: bool,
    },
}

/// Handle read-only catalog commands
pub async fn handle_lookup_command(command: LookupCommands, ctx: &mut Context) -> Result<()> {
    match command {
        LookupCommands::List { kind, list } => {
            ctx.open(View::DocumentSearch)?;
            list_entries(ctx, kind, &list).await
        }
    }
}

/// Handle commands for a managed catalog
pub async fn handle_catalog_command(
    command: CatalogCommands,
    kind: LookupKind,
    view: View,
    ctx: &mut Context,
) -> Result<()> {
    ctx.open(view)?;

    match command {
        CatalogCommands::List { list } => list_entries(ctx, kind, &list).await,
        CatalogCommands::Create { name, description } => {
            create_entry(ctx, kind, name, description).await
        }
        CatalogCommands::Rename {
            entry,
            name,
            description,
        } => rename_entry(ctx, kind, &entry, name, description).await,
        CatalogCommands::Delete { entry, yes } => delete_entry(ctx, kind, &entry, yes).await,
    }
}

async fn fetch_entries(ctx: &mut Context, kind: LookupKind) -> Result<Vec<Lookup>> {
    let fetched = ctx.client.list_lookup(kind).await;
    fetched.map_err(|e| ctx.api_error(e))
}

/// Resolve an entry given by id or name
async fn find_entry(ctx: &mut Context, kind: LookupKind, entry: &str) -> Result<Lookup> {
    let entries = fetch_entries(ctx, kind).await?;
    let id = resolve_lookup(&entries, entry, kind.label())?;
    entries
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| anyhow::anyhow!("No entry with id {} in {}", id, kind.label()))
}

/// List catalog entries
async fn list_entries(ctx: &mut Context, kind: LookupKind, list: &ListArgs) -> Result<()> {
    let view = list.table_view::<Lookup>()?;
    let entries = fetch_entries(ctx, kind).await?;
    let page = view.apply(&entries);

    if page.total == 0 {
        println!("{}", format!("No {} found.", kind.label()).yellow());
        return Ok(());
    }

    println!("{}", format!("{} ({}):", capitalize(kind.label()), page.total).bold());
    for entry in &page.rows {
        match &entry.description {
            Some(description) => println!(
                "  {} {} {}",
                format!("{:>4}", entry.id).dimmed(),
                entry.name,
                format!("({})", description).dimmed()
            ),
            None => println!("  {} {}", format!("{:>4}", entry.id).dimmed(), entry.name),
        }
    }
    print_page_footer(&page);

    Ok(())
}

async fn create_entry(
    ctx: &mut Context,
    kind: LookupKind,
    name: String,
    description: Option<String>,
) -> Result<()> {
    let req = entry_request(name, description)?;

    let created = ctx.client.create_lookup(kind, &req).await;
    let entry = created.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!(
        "Created '{}' (id {}).",
        entry.name, entry.id
    )));
    Ok(())
}

async fn rename_entry(
    ctx: &mut Context,
    kind: LookupKind,
    entry: &str,
    name: String,
    description: Option<String>,
) -> Result<()> {
    let current = find_entry(ctx, kind, entry).await?;
    let req = entry_request(name, description.or(current.description))?;

    let updated = ctx.client.update_lookup(kind, current.id, &req).await;
    let entry = updated.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!(
        "Renamed '{}' to '{}'.",
        current.name, entry.name
    )));
    Ok(())
}

async fn delete_entry(ctx: &mut Context, kind: LookupKind, entry: &str, confirmed: bool) -> Result<()> {
    let current = find_entry(ctx, kind, entry).await?;
    if !confirmed {
        print_notice(&Notice::info(format!(
            "This will delete '{}'. Re-run with --yes to confirm.",
            current.name
        )));
        return Ok(());
    }

    let deleted = ctx.client.delete_lookup(kind, current.id).await;
    deleted.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!("Deleted '{}'.", current.name)));
    Ok(())
}

/// Build the request body, rejecting a blank name
fn entry_request(name: String, description: Option<String>) -> Result<LookupRequest> {
    let name = name.trim().to_string();
    if name.is_empty() {
        anyhow::bail!("Name is required");
    }

    Ok(LookupRequest {
        name,
        description: description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
    })
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
