//! Audit trail command handlers

use anyhow::Result;
use chrono::NaiveDate;
use clap::Subcommand;
use colored::*;
use digesto_core::auth::View;
use digesto_core::domain::audit::AuditRecord;
use digesto_core::dto::audit::AuditQuery;

use super::{ListArgs, print_page_footer};
use crate::context::Context;

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit records
    List {
        /// Only records by this user
        #[arg(long)]
        user: Option<String>,

        /// Only records of this action
        #[arg(long)]
        action: Option<String>,

        /// Records on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Records on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        list: ListArgs,
    },
}

/// Handle audit commands
pub async fn handle_audit_command(command: AuditCommands, ctx: &mut Context) -> Result<()> {
    match command {
        AuditCommands::List {
            user,
            action,
            from,
            to,
            list,
        } => {
            let query = AuditQuery {
                user,
                action,
                from,
                to,
            };
            list_records(ctx, &query, &list).await
        }
    }
}

/// List audit records, newest first unless another sort is given
async fn list_records(ctx: &mut Context, query: &AuditQuery, list: &ListArgs) -> Result<()> {
    ctx.open(View::AuditLog)?;
    let view = list.table_view::<AuditRecord>()?;

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            anyhow::bail!("--from ({}) is after --to ({})", from, to);
        }
    }

    let fetched = ctx.client.list_audit_records(query).await;
    let mut records = fetched.map_err(|e| ctx.api_error(e))?;
    if list.sort.is_none() {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    let page = view.apply(&records);
    if page.total == 0 {
        println!("{}", "No audit records found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} record(s):", page.total).bold());
    println!();
    for record in &page.rows {
        print_record(record);
    }
    print_page_footer(&page);

    Ok(())
}

fn print_record(record: &AuditRecord) {
    let target = match record.entity_id {
        Some(id) => format!("{} #{}", record.entity, id),
        None => record.entity.clone(),
    };

    println!(
        "  {} {} {} {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        record.user.cyan(),
        record.action.bold(),
        target
    );
    if let Some(detail) = &record.detail {
        println!("      {}", detail.dimmed());
    }
}
