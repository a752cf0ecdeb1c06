//! Commands module
//!
//! Defines all CLI commands and their handlers. Each subcommand is one
//! console view.

mod audit;
mod auth;
mod catalog;
mod document;
mod user;

pub use audit::AuditCommands;
pub use catalog::{CatalogCommands, LookupCommands};
pub use document::DocumentCommands;
pub use user::UserCommands;

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use digesto_core::auth::View;
use digesto_core::domain::lookup::LookupKind;
use digesto_core::form::FieldError;
use digesto_core::notice::{Notice, NoticeLevel};
use digesto_core::table::{Page, Paginator, SortState, TableRow, TableView};

use crate::config::Config;
use crate::context::Context;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Password (prompted when omitted)
        #[arg(long, env = "DIGESTO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse, search and edit documents
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// User administration
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Read lookup catalogs
    Lookup {
        #[command(subcommand)]
        command: LookupCommands,
    },
    /// Sector administration
    Sector {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Role administration
    Role {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Audit trail
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let mut ctx = Context::load(config)?;

    match command {
        Commands::Login { email, password } => auth::login(&mut ctx, email, password).await,
        Commands::Logout => auth::logout(&mut ctx),
        Commands::Whoami => auth::whoami(&mut ctx),
        Commands::Document { command } => document::handle_document_command(command, &mut ctx).await,
        Commands::User { command } => user::handle_user_command(command, &mut ctx).await,
        Commands::Lookup { command } => catalog::handle_lookup_command(command, &mut ctx).await,
        Commands::Sector { command } => {
            catalog::handle_catalog_command(command, LookupKind::Sector, View::SectorAdmin, &mut ctx)
                .await
        }
        Commands::Role { command } => {
            catalog::handle_catalog_command(command, LookupKind::Role, View::RoleAdmin, &mut ctx)
                .await
        }
        Commands::Audit { command } => audit::handle_audit_command(command, &mut ctx).await,
    }
}

/// Filter/sort/page options shared by the list views
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Keep rows containing this text in any column
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort column, optionally with direction (e.g. `date:desc`)
    #[arg(long, value_parser = SortState::parse)]
    pub sort: Option<SortState>,

    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (5, 10, 25 or 100)
    #[arg(long, default_value = "10")]
    pub page_size: usize,
}

impl ListArgs {
    /// Table state for rows of type `T`; an unknown sort column is an error
    pub fn table_view<T: TableRow>(&self) -> Result<TableView> {
        let view = TableView {
            filter: self.filter.clone().unwrap_or_default(),
            sort: self.sort.clone(),
            paginator: Paginator::new(self.page.saturating_sub(1), self.page_size),
        };
        view.check::<T>()?;
        Ok(view)
    }
}

/// Print an operation outcome
pub fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => println!("{} {}", "✓".green(), notice.message.green()),
        NoticeLevel::Info => println!("{} {}", "ℹ".cyan(), notice.message),
        NoticeLevel::Error => eprintln!("{} {}", "✗".red(), notice.message.red()),
    }
}

/// Report failed form rules and abort the command
pub fn reject_form(errors: Vec<FieldError>) -> anyhow::Error {
    print_notice(&Notice::error("The form has errors:"));
    for error in &errors {
        eprintln!("  {} {}", "•".red(), error);
    }
    anyhow::anyhow!("{} field(s) failed validation", errors.len())
}

/// Print the "page X of Y" footer of a list view
pub fn print_page_footer<T>(page: &Page<'_, T>) {
    println!(
        "{}",
        format!(
            "Page {} of {} ({} row(s))",
            page.page_index + 1,
            page.page_count,
            page.total
        )
        .dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use digesto_core::domain::document::Document;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_parse_document_list_options() {
        let cli = TestCli::try_parse_from([
            "digesto", "document", "list", "--sort", "date:desc", "--page", "2", "--page-size", "25",
        ])
        .unwrap();

        let Commands::Document {
            command: DocumentCommands::List { list, .. },
        } = cli.command
        else {
            panic!("expected document list");
        };
        let view = list.table_view::<Document>().unwrap();
        assert_eq!(view.sort, Some(SortState::desc("date")));
        assert_eq!(view.paginator, Paginator::new(1, 25));
    }

    #[test]
    fn test_rejects_bad_sort() {
        assert!(TestCli::try_parse_from(["digesto", "user", "list", "--sort", "name:sideways"]).is_err());
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let args = ListArgs {
            page: 0,
            page_size: 10,
            ..ListArgs::default()
        };
        assert_eq!(args.table_view::<Document>().unwrap().paginator.page_index, 0);
    }

    #[test]
    fn test_unknown_sort_column_is_rejected() {
        let args = ListArgs {
            sort: Some(SortState::asc("nonsense")),
            page: 1,
            page_size: 10,
            ..ListArgs::default()
        };
        let err = args.table_view::<Document>().unwrap_err();
        assert!(err.to_string().contains("unknown sort column 'nonsense'"));
        assert!(args.table_view::<Document>().is_err());

        let args = ListArgs {
            sort: Some(SortState::desc("date")),
            ..args
        };
        assert!(args.table_view::<Document>().is_ok());
    }

    #[test]
    fn test_parse_catalog_commands() {
        let cli = TestCli::try_parse_from(["digesto", "lookup", "list", "types"]).unwrap();
        let Commands::Lookup {
            command: LookupCommands::List { kind, .. },
        } = cli.command
        else {
            panic!("expected lookup list");
        };
        assert_eq!(kind, LookupKind::DocumentType);

        let cli =
            TestCli::try_parse_from(["digesto", "sector", "rename", "Legales", "Asuntos legales"])
                .unwrap();
        let Commands::Sector {
            command: CatalogCommands::Rename { entry, name, .. },
        } = cli.command
        else {
            panic!("expected sector rename");
        };
        assert_eq!(entry, "Legales");
        assert_eq!(name, "Asuntos legales");

        assert!(TestCli::try_parse_from(["digesto", "lookup", "list", "colors"]).is_err());
    }

    #[test]
    fn test_parse_document_create() {
        let cli = TestCli::try_parse_from([
            "digesto",
            "document",
            "create",
            "--title",
            "Reglamento",
            "--date",
            "2024-05-01",
            "--keywords",
            "obras,viales",
            "--reference",
            "3",
            "--reference",
            "RES-1/2024",
        ])
        .unwrap();

        let Commands::Document {
            command: DocumentCommands::Create { fields },
        } = cli.command
        else {
            panic!("expected document create");
        };
        assert_eq!(fields.title.as_deref(), Some("Reglamento"));
        assert_eq!(fields.date, chrono::NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(fields.reference, vec!["3", "RES-1/2024"]);
        assert!(fields.file.is_empty());
    }
}
