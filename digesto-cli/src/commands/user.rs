//! User administration command handlers

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use digesto_core::auth::View;
use digesto_core::domain::lookup::{Lookup, LookupKind};
use digesto_core::domain::user::User;
use digesto_core::form::UserForm;
use digesto_core::notice::Notice;

use super::{ListArgs, print_notice, print_page_footer, reject_form};
use crate::context::Context;
use crate::id_resolver::{find_user, resolve_lookup};

const ACTIVE_STATUS: &str = "Activo";
const INACTIVE_STATUS: &str = "Inactivo";

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// List users
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show a user
    Get {
        /// User id or email
        user: String,
    },
    /// Create a user
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    /// Edit a user
    Edit {
        /// User id or email
        user: String,

        #[command(flatten)]
        fields: UserFields,
    },
    /// Change a user's status
    SetStatus {
        /// User id or email
        user: String,

        /// Status (id or name)
        status: String,
    },
    /// Set a user's status to active
    Activate {
        /// User id or email
        user: String,
    },
    /// Set a user's status to inactive
    Deactivate {
        /// User id or email
        user: String,
    },
}

/// Form fields of `create` and `edit`
#[derive(Args, Debug, Clone, Default)]
pub struct UserFields {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// New password (confirmation must match)
    #[arg(long, env = "DIGESTO_NEW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "DIGESTO_NEW_PASSWORD_CONFIRMATION", hide_env_values = true)]
    pub confirm_password: Option<String>,

    /// Role (id or name)
    #[arg(long)]
    pub role: Option<String>,

    /// Sector (id or name)
    #[arg(long)]
    pub sector: Option<String>,

    /// Job title (id or name)
    #[arg(long)]
    pub job_title: Option<String>,

    /// Status (id or name)
    #[arg(long)]
    pub status: Option<String>,
}

struct UserLookups {
    roles: Vec<Lookup>,
    sectors: Vec<Lookup>,
    job_titles: Vec<Lookup>,
    statuses: Vec<Lookup>,
}

/// Handle user commands
pub async fn handle_user_command(command: UserCommands, ctx: &mut Context) -> Result<()> {
    match command {
        UserCommands::List { list } => list_users(ctx, &list).await,
        UserCommands::Get { user } => get_user(ctx, &user).await,
        UserCommands::Create { fields } => create_user(ctx, &fields).await,
        UserCommands::Edit { user, fields } => edit_user(ctx, &user, &fields).await,
        UserCommands::SetStatus { user, status } => set_status(ctx, &user, &status).await,
        UserCommands::Activate { user } => set_status(ctx, &user, ACTIVE_STATUS).await,
        UserCommands::Deactivate { user } => set_status(ctx, &user, INACTIVE_STATUS).await,
    }
}

async fn fetch_users(ctx: &mut Context) -> Result<Vec<User>> {
    let fetched = ctx.client.list_users().await;
    fetched.map_err(|e| ctx.api_error(e))
}

async fn fetch_user(ctx: &mut Context, input: &str) -> Result<User> {
    let users = fetch_users(ctx).await?;
    Ok(find_user(&users, input)?.clone())
}

/// Fetch the form catalogs concurrently
async fn load_user_lookups(ctx: &mut Context) -> Result<UserLookups> {
    let client = &ctx.client;
    let fetched = tokio::try_join!(
        client.list_lookup(LookupKind::Role),
        client.list_lookup(LookupKind::Sector),
        client.list_lookup(LookupKind::JobTitle),
        client.list_lookup(LookupKind::UserStatus),
    );

    let (roles, sectors, job_titles, statuses) = fetched.map_err(|e| ctx.api_error(e))?;
    Ok(UserLookups {
        roles,
        sectors,
        job_titles,
        statuses,
    })
}

/// List users
async fn list_users(ctx: &mut Context, list: &ListArgs) -> Result<()> {
    ctx.open(View::UserList)?;
    let view = list.table_view::<User>()?;

    let users = fetch_users(ctx).await?;
    let page = view.apply(&users);

    if page.total == 0 {
        println!("{}", "No users found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} user(s):", page.total).bold());
    println!();
    for user in &page.rows {
        print_user_summary(user);
    }
    print_page_footer(&page);

    Ok(())
}

/// Show a single user
async fn get_user(ctx: &mut Context, input: &str) -> Result<()> {
    ctx.open(View::UserList)?;

    let user = fetch_user(ctx, input).await?;
    print_user_details(&user);
    Ok(())
}

/// Apply CLI field values onto the form
fn apply_fields(form: &mut UserForm, fields: &UserFields, lookups: &UserLookups) -> Result<()> {
    if let Some(first_name) = &fields.first_name {
        form.first_name = first_name.clone();
    }
    if let Some(last_name) = &fields.last_name {
        form.last_name = last_name.clone();
    }
    if let Some(email) = &fields.email {
        form.email = email.clone();
    }
    if let Some(password) = &fields.password {
        form.password = password.clone();
    }
    if let Some(confirmation) = &fields.confirm_password {
        form.password_confirmation = confirmation.clone();
    }
    if let Some(role) = &fields.role {
        form.role_id = Some(resolve_lookup(&lookups.roles, role, "role")?);
    }
    if let Some(sector) = &fields.sector {
        form.sector_id = Some(resolve_lookup(&lookups.sectors, sector, "sector")?);
    }
    if let Some(job_title) = &fields.job_title {
        form.job_title_id = Some(resolve_lookup(&lookups.job_titles, job_title, "job title")?);
    }
    if let Some(status) = &fields.status {
        form.status_id = Some(resolve_lookup(&lookups.statuses, status, "status")?);
    }
    Ok(())
}

/// Create a user
async fn create_user(ctx: &mut Context, fields: &UserFields) -> Result<()> {
    ctx.open(View::UserCreate)?;

    let lookups = load_user_lookups(ctx).await?;
    let mut form = UserForm::new();
    apply_fields(&mut form, fields, &lookups)?;
    let req = form.to_request().map_err(reject_form)?;

    let created = ctx.client.create_user(&req).await;
    let user = created.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!(
        "User {} created (id {}).",
        user.email, user.id
    )));
    print_user_details(&user);
    Ok(())
}

/// Edit a user
async fn edit_user(ctx: &mut Context, input: &str, fields: &UserFields) -> Result<()> {
    ctx.open(View::UserEdit)?;

    let current = fetch_user(ctx, input).await?;
    let lookups = load_user_lookups(ctx).await?;

    let mut form = UserForm::from_user(&current);
    apply_fields(&mut form, fields, &lookups)?;
    let req = form.to_request().map_err(reject_form)?;

    let updated = ctx.client.update_user(current.id, &req).await;
    let user = updated.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!("User {} updated.", user.email)));
    print_user_details(&user);
    Ok(())
}

/// Change a user's status
async fn set_status(ctx: &mut Context, input: &str, status: &str) -> Result<()> {
    ctx.open(View::UserEdit)?;

    let user = fetch_user(ctx, input).await?;
    let fetched = ctx.client.list_lookup(LookupKind::UserStatus).await;
    let statuses = fetched.map_err(|e| ctx.api_error(e))?;
    let status_id = resolve_lookup(&statuses, status, "status")?;

    if user.status.id == status_id {
        print_notice(&Notice::info(format!(
            "{} is already {}.",
            user.email, user.status.name
        )));
        return Ok(());
    }

    let updated = ctx.client.set_user_status(user.id, status_id).await;
    let user = updated.map_err(|e| ctx.api_error(e))?;

    print_notice(&Notice::success(format!(
        "{} is now {}.",
        user.email, user.status.name
    )));
    Ok(())
}

fn print_user_summary(user: &User) {
    println!(
        "  {} {} {}",
        "▸".cyan(),
        user.full_name().bold(),
        format!("#{}", user.id).dimmed()
    );
    println!("    Email:   {}", user.email);
    println!("    Role:    {}", user.role.name);
    println!("    Sector:  {}", user.sector.name);
    println!("    Status:  {}", format_status(&user.status.name));
    println!();
}

fn print_user_details(user: &User) {
    println!("{}", "User Details:".bold());
    println!("  ID:        {}", user.id.to_string().cyan());
    println!("  Name:      {}", user.full_name());
    println!("  Email:     {}", user.email);
    if let Some(dni) = &user.dni {
        println!("  DNI:       {}", dni);
    }
    if let Some(phone) = &user.phone {
        println!("  Phone:     {}", phone);
    }
    println!("  Role:      {}", user.role.name);
    println!("  Sector:    {}", user.sector.name);
    if let Some(job_title) = &user.job_title {
        println!("  Job title: {}", job_title.name);
    }
    println!("  Status:    {}", format_status(&user.status.name));
}

fn format_status(status: &str) -> ColoredString {
    if status.eq_ignore_ascii_case(ACTIVE_STATUS) {
        status.green()
    } else if status.eq_ignore_ascii_case(INACTIVE_STATUS) {
        status.red()
    } else {
        status.yellow()
    }
}
