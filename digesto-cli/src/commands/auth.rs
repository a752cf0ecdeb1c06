//! Session command handlers
//!
//! Login, logout and the current-user view.

use std::io::{BufRead, IsTerminal};

use anyhow::{Context as _, Result};
use colored::*;
use digesto_core::auth::{Session, View};
use digesto_core::dto::auth::Credentials;
use digesto_core::notice::Notice;

use super::print_notice;
use crate::context::Context;

/// Sign in and persist the session
pub async fn login(ctx: &mut Context, email: String, password: Option<String>) -> Result<()> {
    ctx.open(View::Login)?;

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let credentials = Credentials {
        email: email.trim().to_string(),
        password,
    };

    let session = match ctx.client.sign_in(&credentials).await {
        Ok(session) => session,
        Err(e) if e.is_unauthorized() => anyhow::bail!("Invalid email or password."),
        Err(e) => return Err(ctx.api_error(e)),
    };

    let name = session.display_name.clone();
    ctx.store_session(session)?;
    print_notice(&Notice::success(format!("Welcome, {}!", name)));

    Ok(())
}

/// Forget the stored session
pub fn logout(ctx: &mut Context) -> Result<()> {
    if ctx.session.is_none() {
        print_notice(&Notice::info("No active session."));
        return Ok(());
    }

    ctx.discard_session()?;
    print_notice(&Notice::success("Signed out."));
    Ok(())
}

/// Show the signed-in user
pub fn whoami(ctx: &mut Context) -> Result<()> {
    ctx.open(View::Profile)?;

    if let Some(session) = &ctx.session {
        print_session(session);
    }
    Ok(())
}

/// Ask for the password without echoing it; piped input is read as a line
fn prompt_password() -> Result<String> {
    let stdin = std::io::stdin();
    let password = if stdin.is_terminal() {
        rpassword::prompt_password("Password: ").context("Failed to read password")?
    } else {
        read_password_line(stdin.lock())?
    };

    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }
    Ok(password)
}

fn read_password_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read password")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_session(session: &Session) {
    println!("{}", "Signed in as:".bold());
    println!("  Name:    {}", session.display_name.cyan());
    println!("  Email:   {}", session.email);
    println!("  Role:    {} ({})", session.role_name, session.role.to_string().dimmed());
    if let Some(sector) = &session.sector {
        println!("  Sector:  {}", sector.name);
    }
    match session.expires_at {
        Some(expires) => println!(
            "  Expires: {}",
            expires.format("%Y-%m-%d %H:%M:%S UTC").to_string().dimmed()
        ),
        None => println!("  Expires: {}", "on logout".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_piped_password_keeps_inner_spaces() {
        let password = read_password_line(Cursor::new("  secreto 123 \r\nsobrante\n")).unwrap();
        assert_eq!(password, "  secreto 123 ");

        assert_eq!(read_password_line(Cursor::new("")).unwrap(), "");
    }
}
