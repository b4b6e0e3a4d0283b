//! One-shot subcommands: catalogue listings and admin operations.
//!
//! Each command talks to the server through the same [`NewsApi`] the TUI
//! uses and prints plain lines to `out`, so the output is easy to pipe.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::api::{Credentials, NewFeed, NewsApi};
use crate::cli::{AdminCommand, AdminLogin, Command};
use crate::feed_check;

pub async fn run(
    api: &dyn NewsApi,
    command: Command,
    timeout: Duration,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Labels => {
            let labels = api.labels().await.context("fetching labels")?;
            print_list(out, &labels, "No categories found")?;
        }
        Command::Sources => {
            let sources = api.sources().await.context("fetching sources")?;
            print_list(out, &sources, "No sources found")?;
        }
        Command::Feeds { source } => {
            let feeds = api
                .feeds(&source)
                .await
                .with_context(|| format!("fetching feeds for `{source}`"))?;
            print_list(out, &feeds, "No feeds found")?;
        }
        Command::Admin { login, command } => {
            sign_in_as_admin(api, &login).await?;
            let outcome = run_admin(api, command, timeout, out).await;
            api.logout();
            outcome?;
        }
    }
    Ok(())
}

fn print_list(out: &mut impl Write, items: &[String], empty: &str) -> Result<()> {
    if items.is_empty() {
        writeln!(out, "{empty}")?;
    }
    for item in items {
        writeln!(out, "{item}")?;
    }
    Ok(())
}

async fn sign_in_as_admin(api: &dyn NewsApi, login: &AdminLogin) -> Result<()> {
    let credentials = Credentials {
        username: login.username.clone(),
        password: login.password.clone(),
    };
    api.login(&credentials)
        .await
        .with_context(|| format!("logging in as `{}`", login.username))?;

    let admin = api
        .admin_status()
        .await
        .context("checking admin rights")?;
    if !admin {
        api.logout();
        bail!("`{}` is not an administrator", login.username);
    }
    tracing::info!(username = %login.username, "signed in as admin");
    Ok(())
}

async fn run_admin(
    api: &dyn NewsApi,
    command: AdminCommand,
    timeout: Duration,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        AdminCommand::AddFeed {
            name,
            feed,
            category,
            interval,
            check,
        } => {
            if check {
                let preview = feed_check::fetch(&feed, timeout)
                    .await
                    .with_context(|| format!("refusing to add `{feed}`"))?;
                writeln!(out, "{}", preview.summary())?;
            }

            let new_feed = NewFeed {
                name,
                feed,
                category,
                interval,
            };
            api.add_feed(&new_feed)
                .await
                .with_context(|| format!("adding feed `{}`", new_feed.feed))?;
            writeln!(out, "Added {} to {}", new_feed.feed, new_feed.name)?;
        }
        AdminCommand::RemoveFeed { feeds } => {
            api.remove_feeds(&feeds).await.context("removing feeds")?;
            writeln!(out, "Removed {} feed(s)", feeds.len())?;
        }
        AdminCommand::DeleteUser { username } => {
            api.delete_user(&username)
                .await
                .with_context(|| format!("deleting user `{username}`"))?;
            writeln!(out, "Deleted {username}")?;
        }
        AdminCommand::Grant { usernames } => {
            api.grant_admin(&usernames)
                .await
                .context("granting admin rights")?;
            writeln!(out, "Granted admin rights to {}", usernames.join(", "))?;
        }
    }
    Ok(())
}
