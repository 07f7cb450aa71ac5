//! Admin account command handlers

use anyhow::{Context, bail};
use std::io::BufRead;

use crate::config::Config;
use crate::db::Store;
use crate::db::repositories::admin::hash_password;

fn read_password_from_stdin() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}

pub async fn cmd_create_admin(
    config: &Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() {
        bail!("Username cannot be empty");
    }

    let password = match password {
        Some(p) if !p.is_empty() => p,
        Some(_) => bail!("Password cannot be empty"),
        None => read_password_from_stdin()?,
    };

    let store = Store::new(&config.general.database_path).await?;
    let admin = store
        .admins()
        .upsert(username, &password, &config.security)
        .await?;

    println!("✓ Admin '{}' is ready (id {})", admin.username, admin.id);
    if admin.username != config.auth.admin_login {
        println!(
            "Note: only '{}' may use admin endpoints; set ADMIN_LOGIN to grant access.",
            config.auth.admin_login
        );
    }
    Ok(())
}

pub async fn cmd_set_admin_active(
    config: &Config,
    username: &str,
    active: bool,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if !store.admins().set_active(username, active).await? {
        bail!("No admin named '{username}'");
    }

    let state = if active { "enabled" } else { "disabled" };
    println!("✓ Admin '{username}' {state}");
    Ok(())
}

pub fn cmd_hash_password(config: &Config, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password_from_stdin()?,
    };

    println!("{}", hash_password(&password, Some(&config.security))?);
    Ok(())
}
