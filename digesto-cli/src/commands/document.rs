//! Document command handlers
//!
//! Browsing and searching are public; creating, editing, retiring and
//! uploading require an editor session.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::*;
use digesto_core::auth::View;
use digesto_core::domain::document::Document;
use digesto_core::domain::lookup::{Lookup, LookupKind};
use digesto_core::form::{DocumentForm, KeywordChips, ReferenceChips, split_chip_input};
use digesto_core::notice::Notice;
use digesto_core::search::DocumentFilter;
use digesto_core::table::TableView;

use super::{ListArgs, print_notice, print_page_footer, reject_form};
use crate::context::Context;
use crate::id_resolver::{find_document, resolve_document_id, resolve_lookup};
use crate::types::DocRef;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// List documents, filtered and sorted locally
    List {
        #[command(flatten)]
        criteria: FilterArgs,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Search documents on the server
    Search {
        #[command(flatten)]
        criteria: FilterArgs,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Show a document
    Get {
        /// Document id or number
        id: String,
    },
    /// Create a document
    Create {
        #[command(flatten)]
        fields: DocumentFields,
    },
    /// Edit a document
    Edit {
        /// Document id or number
        id: String,

        #[command(flatten)]
        fields: DocumentFields,

        /// Keywords to remove (comma-separated)
        #[arg(long)]
        remove_keywords: Option<String>,

        /// References to remove (id or number, repeatable)
        #[arg(long)]
        remove_reference: Vec<String>,
    },
    /// Retire (deactivate) a document
    Retire {
        /// Document id or number
        id: String,

        /// Confirm the operation
        #[arg(long)]
        yes: bool,
    },
    /// Upload a file to attach later
    Upload {
        /// File to upload
        path: PathBuf,
    },
    /// Download an attached file
    Download {
        /// Document id or number
        id: String,

        /// Attached file name
        file: String,

        /// Output path (defaults to the file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Suggest catalog keywords for a partial input
    SuggestKeywords {
        /// Partial keyword
        query: String,
    },
    /// Suggest documents that can be referenced
    SuggestReferences {
        /// Partial number or title
        query: String,

        /// Document being edited (excluded with its current references)
        #[arg(long = "for")]
        for_document: Option<String>,
    },
}

/// Search criteria shared by `list` and `search`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Text contained in number, title or summary
    #[arg(long)]
    pub text: Option<String>,

    /// Document type (id or name)
    #[arg(long = "type")]
    pub doc_type: Option<String>,

    /// Sector (id or name)
    #[arg(long)]
    pub sector: Option<String>,

    /// Status (id or name)
    #[arg(long)]
    pub status: Option<String>,

    /// Keyword
    #[arg(long)]
    pub keyword: Option<String>,

    /// Created on or after (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Created on or before (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Form fields of `create` and `edit`
#[derive(Args, Debug, Clone, Default)]
pub struct DocumentFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    /// Creation date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub summary: Option<String>,

    /// Document type (id or name)
    #[arg(long = "type")]
    pub doc_type: Option<String>,

    /// Sector (id or name)
    #[arg(long)]
    pub sector: Option<String>,

    /// Status (id or name)
    #[arg(long)]
    pub status: Option<String>,

    /// Keywords to add (comma-separated)
    #[arg(long)]
    pub keywords: Option<String>,

    /// Document to reference (id or number, repeatable)
    #[arg(long)]
    pub reference: Vec<String>,

    /// File to upload and attach (repeatable)
    #[arg(long)]
    pub file: Vec<PathBuf>,
}

/// Catalogs the document form selects from
struct FormLookups {
    types: Vec<Lookup>,
    sectors: Vec<Lookup>,
    statuses: Vec<Lookup>,
    keywords: Vec<Lookup>,
}

/// Handle document commands
pub async fn handle_document_command(command: DocumentCommands, ctx: &mut Context) -> Result<()> {
    match command {
        DocumentCommands::List { criteria, list } => list_documents(ctx, &criteria, &list).await,
        DocumentCommands::Search { criteria, list } => search_documents(ctx, &criteria, &list).await,
        DocumentCommands::Get { id } => get_document(ctx, &id).await,
        DocumentCommands::Create { fields } => create_document(ctx, fields).await,
        DocumentCommands::Edit {
            id,
            fields,
            remove_keywords,
            remove_reference,
        } => edit_document(ctx, &id, fields, remove_keywords, remove_reference).await,
        DocumentCommands::Retire { id, yes } => retire_document(ctx, &id, yes).await,
        DocumentCommands::Upload { path } => upload_file(ctx, &path).await,
        DocumentCommands::Download { id, file, out } => download_file(ctx, &id, &file, out).await,
        DocumentCommands::SuggestKeywords { query } => suggest_keywords(ctx, &query).await,
        DocumentCommands::SuggestReferences {
            query,
            for_document,
        } => suggest_references(ctx, &query, for_document).await,
    }
}

/// Fetch the form catalogs concurrently
async fn load_form_lookups(ctx: &mut Context) -> Result<FormLookups> {
    let client = &ctx.client;
    let fetched = tokio::try_join!(
        client.list_lookup(LookupKind::DocumentType),
        client.list_lookup(LookupKind::Sector),
        client.list_lookup(LookupKind::DocumentStatus),
        client.list_lookup(LookupKind::Keyword),
    );

    let (types, sectors, statuses, keywords) = fetched.map_err(|e| ctx.api_error(e))?;
    Ok(FormLookups {
        types,
        sectors,
        statuses,
        keywords,
    })
}

async fn fetch_documents(ctx: &mut Context) -> Result<Vec<Document>> {
    let fetched = ctx.client.list_documents().await;
    fetched.map_err(|e| ctx.api_error(e))
}

async fn fetch_document(ctx: &mut Context, id: &str) -> Result<Document> {
    let doc_ref = DocRef::parse(id);
    let document_id = resolve_document_id(ctx, &doc_ref).await?;
    let fetched = ctx.client.get_document(document_id).await;
    fetched.map_err(|e| ctx.api_error(e))
}

/// Turn the CLI criteria into a filter, resolving catalog names
async fn build_filter(ctx: &mut Context, criteria: &FilterArgs) -> Result<DocumentFilter> {
    let mut filter = DocumentFilter {
        text: criteria.text.clone(),
        keyword: criteria.keyword.clone(),
        from: criteria.from,
        to: criteria.to,
        ..Default::default()
    };

    if criteria.doc_type.is_some() || criteria.sector.is_some() || criteria.status.is_some() {
        let lookups = load_form_lookups(ctx).await?;
        if let Some(doc_type) = &criteria.doc_type {
            filter.type_id = Some(resolve_lookup(&lookups.types, doc_type, "document type")?);
        }
        if let Some(sector) = &criteria.sector {
            filter.sector_id = Some(resolve_lookup(&lookups.sectors, sector, "sector")?);
        }
        if let Some(status) = &criteria.status {
            filter.status_id = Some(resolve_lookup(&lookups.statuses, status, "status")?);
        }
    }

    Ok(filter)
}

/// List documents with local filtering
async fn list_documents(ctx: &mut Context, criteria: &FilterArgs, list: &ListArgs) -> Result<()> {
    ctx.open(View::DocumentList)?;
    let view = list.table_view::<Document>()?;

    let filter = build_filter(ctx, criteria).await?;
    let documents = fetch_documents(ctx).await?;
    let matching: Vec<Document> = filter.apply(&documents).into_iter().cloned().collect();

    print_document_table(&matching, &view);
    Ok(())
}

/// Search documents server-side
async fn search_documents(ctx: &mut Context, criteria: &FilterArgs, list: &ListArgs) -> Result<()> {
    ctx.open(View::DocumentSearch)?;
    let view = list.table_view::<Document>()?;

    let filter = build_filter(ctx, criteria).await?;
    if filter.is_empty() {
        print_notice(&Notice::info("No search criteria given; showing all documents."));
    }

    let found = ctx.client.search_documents(&filter).await;
    let documents = found.map_err(|e| ctx.api_error(e))?;

    print_document_table(&documents, &view);
    Ok(())
}

/// Show a single document
async fn get_document(ctx: &mut Context, id: &str) -> Result<()> {
    ctx.open(View::DocumentDetail)?;

    let document = fetch_document(ctx, id).await?;
    print_document_details(&document);
    Ok(())
}

/// Apply CLI field values onto the form
fn apply_fields(
    form: &mut DocumentForm,
    fields: &DocumentFields,
    lookups: &FormLookups,
    documents: &[Document],
) -> Result<()> {
    if let Some(title) = &fields.title {
        form.title = title.clone();
    }
    if let Some(number) = &fields.number {
        form.number = number.clone();
    }
    if let Some(date) = fields.date {
        form.created_on = Some(date);
    }
    if let Some(summary) = &fields.summary {
        form.summary = summary.clone();
    }
    if let Some(doc_type) = &fields.doc_type {
        form.type_id = Some(resolve_lookup(&lookups.types, doc_type, "document type")?);
    }
    if let Some(sector) = &fields.sector {
        form.sector_id = Some(resolve_lookup(&lookups.sectors, sector, "sector")?);
    }
    if let Some(status) = &fields.status {
        form.status_id = Some(resolve_lookup(&lookups.statuses, status, "status")?);
    }
    if let Some(keywords) = &fields.keywords {
        form.keywords.add_from_catalog(keywords, &lookups.keywords);
    }

    for reference in &fields.reference {
        let target = find_document(documents, &DocRef::parse(reference))?;
        if let Err(rejection) = form.references.add(target.as_reference()) {
            print_notice(&Notice::info(format!(
                "Skipped reference {}: {}",
                target.number, rejection
            )));
        }
    }

    Ok(())
}

/// Upload the requested files and attach them to the form
async fn attach_files(ctx: &mut Context, form: &mut DocumentForm, files: &[PathBuf]) -> Result<()> {
    for path in files {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?;

        let uploaded = ctx.client.upload_file(file_name, contents).await;
        let file = uploaded.map_err(|e| ctx.api_error(e))?;
        print_notice(&Notice::info(format!("Uploaded {} (file {})", file.name, file.id)));
        form.attach_file(file.id);
    }
    Ok(())
}

/// Create a new document
async fn create_document(ctx: &mut Context, fields: DocumentFields) -> Result<()> {
    ctx.open(View::DocumentCreate)?;

    let lookups = load_form_lookups(ctx).await?;
    let documents = if fields.reference.is_empty() {
        Vec::new()
    } else {
        fetch_documents(ctx).await?
    };

    let mut form = DocumentForm::new();
    apply_fields(&mut form, &fields, &lookups, &documents)?;
    form.validate().map_err(reject_form)?;

    attach_files(ctx, &mut form, &fields.file).await?;
    let req = form.to_request().map_err(reject_form)?;

    let created = ctx.client.create_document(&req).await;
    let document = created.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!(
        "Document {} created (id {}).",
        document.number, document.id
    )));
    print_document_details(&document);
    Ok(())
}

/// Edit an existing document
async fn edit_document(
    ctx: &mut Context,
    id: &str,
    fields: DocumentFields,
    remove_keywords: Option<String>,
    remove_reference: Vec<String>,
) -> Result<()> {
    ctx.open(View::DocumentEdit)?;

    let current = fetch_document(ctx, id).await?;
    let lookups = load_form_lookups(ctx).await?;
    let documents = if fields.reference.is_empty() && remove_reference.is_empty() {
        Vec::new()
    } else {
        fetch_documents(ctx).await?
    };

    let mut form = DocumentForm::from_document(&current);
    if let Some(raw) = &remove_keywords {
        for keyword in split_chip_input(raw) {
            if !form.keywords.remove(keyword) {
                print_notice(&Notice::info(format!("Keyword '{}' was not set", keyword)));
            }
        }
    }
    for reference in &remove_reference {
        let target = find_document(&documents, &DocRef::parse(reference))?;
        if !form.references.remove(target.id) {
            print_notice(&Notice::info(format!("{} was not referenced", target.number)));
        }
    }
    apply_fields(&mut form, &fields, &lookups, &documents)?;
    form.validate().map_err(reject_form)?;

    attach_files(ctx, &mut form, &fields.file).await?;
    let req = form.to_request().map_err(reject_form)?;

    let updated = ctx.client.update_document(current.id, &req).await;
    let document = updated.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!("Document {} updated.", document.number)));
    print_document_details(&document);
    Ok(())
}

/// Retire a document after confirmation
async fn retire_document(ctx: &mut Context, id: &str, confirmed: bool) -> Result<()> {
    ctx.open(View::DocumentRetire)?;

    let document = fetch_document(ctx, id).await?;
    if !confirmed {
        print_notice(&Notice::info(format!(
            "This will retire {}. Re-run with --yes to confirm.",
            document.label()
        )));
        return Ok(());
    }

    let retired = ctx.client.retire_document(document.id).await;
    retired.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!("Document {} retired.", document.number)));
    Ok(())
}

/// Upload a file without attaching it
async fn upload_file(ctx: &mut Context, path: &Path) -> Result<()> {
    ctx.open(View::FileUpload)?;

    let mut scratch = DocumentForm::new();
    attach_files(ctx, &mut scratch, &[path.to_path_buf()]).await?;
    if let Some(file_id) = scratch.file_ids.first() {
        println!("{}", file_id);
    }
    Ok(())
}

/// Download one of a document's files
async fn download_file(ctx: &mut Context, id: &str, file: &str, out: Option<PathBuf>) -> Result<()> {
    ctx.open(View::DocumentDetail)?;

    let document = fetch_document(ctx, id).await?;
    let attached = document
        .files
        .iter()
        .find(|f| f.name == file)
        .with_context(|| format!("{} has no file named '{}'", document.number, file))?;

    let downloaded = ctx.client.download_file(&attached.name).await;
    let bytes = downloaded.map_err(|e| ctx.api_error(e))?;

    let out = download_target(out, &attached.name)?;
    tokio::fs::write(&out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    print_notice(&Notice::success(format!(
        "Saved {} ({} bytes).",
        out.display(),
        bytes.len()
    )));
    Ok(())
}

/// Where a download is written: `--out` when given, otherwise the bare
/// file name in the current directory
fn download_target(out: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    if let Some(out) = out {
        return Ok(out);
    }

    Path::new(name)
        .file_name()
        .map(PathBuf::from)
        .with_context(|| format!("Refusing to save a file named '{}'; use --out", name))
}

/// Autocomplete keywords from the catalog
async fn suggest_keywords(ctx: &mut Context, query: &str) -> Result<()> {
    ctx.open(View::DocumentCreate)?;

    let fetched = ctx.client.list_lookup(LookupKind::Keyword).await;
    let catalog = fetched.map_err(|e| ctx.api_error(e))?;

    let suggestions = KeywordChips::new().suggest(&catalog, query);
    if suggestions.is_empty() {
        println!("{}", "No matching keywords.".yellow());
    }
    for keyword in suggestions {
        println!("  {} {}", "▸".cyan(), keyword.name);
    }
    Ok(())
}

/// Autocomplete documents for the reference chips
async fn suggest_references(ctx: &mut Context, query: &str, for_document: Option<String>) -> Result<()> {
    ctx.open(View::DocumentEdit)?;

    let documents = fetch_documents(ctx).await?;
    let chips = match &for_document {
        Some(id) => {
            let owner = find_document(&documents, &DocRef::parse(id))?;
            ReferenceChips::from_references(Some(owner.id), &owner.references)
        }
        None => ReferenceChips::new(None),
    };

    let candidates = chips.candidates(&documents, query);
    if candidates.is_empty() {
        println!("{}", "No matching documents.".yellow());
    }
    for document in candidates {
        println!("  {} {} {}", "▸".cyan(), format!("#{}", document.id).dimmed(), document.label());
    }
    Ok(())
}

/// Print one page of a document list
fn print_document_table(documents: &[Document], view: &TableView) {
    let page = view.apply(documents);

    if page.total == 0 {
        println!("{}", "No documents found.".yellow());
        return;
    }

    println!("{}", format!("Found {} document(s):", page.total).bold());
    println!();
    for document in &page.rows {
        print_document_summary(document);
    }
    print_page_footer(&page);
}

/// Print a document summary
fn print_document_summary(document: &Document) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        document.number.bold(),
        format!("#{}", document.id).dimmed()
    );
    println!("    Title:   {}", document.title);
    println!("    Date:    {}", document.created_on.format("%Y-%m-%d").to_string().dimmed());
    println!("    Type:    {}", document.doc_type.name);
    println!("    Sector:  {}", document.sector.name);
    println!("    Status:  {}", document.status.name);
    println!();
}

/// Print detailed document information
fn print_document_details(document: &Document) {
    println!("{}", "Document Details:".bold());
    println!("  ID:      {}", document.id.to_string().cyan());
    println!("  Number:  {}", document.number);
    println!("  Title:   {}", document.title);
    println!("  Date:    {}", document.created_on.format("%Y-%m-%d"));
    println!("  Type:    {}", document.doc_type.name);
    println!("  Sector:  {}", document.sector.name);
    println!("  Status:  {}", document.status.name);

    if let Some(summary) = &document.summary {
        println!("\n{}", "Summary:".bold());
        println!("  {}", summary);
    }

    if !document.keywords.is_empty() {
        let names: Vec<&str> = document.keywords.iter().map(|k| k.name.as_str()).collect();
        println!("\n{} {}", "Keywords:".bold(), names.join(", ").cyan());
    }

    if !document.references.is_empty() {
        println!("\n{}", "References:".bold());
        for reference in &document.references {
            println!("  {} {}", "↳".dimmed(), reference);
        }
    }

    if !document.files.is_empty() {
        println!("\n{}", "Files:".bold());
        for file in &document.files {
            println!("  {} {}", "•".dimmed(), file.name);
        }
    }
}
