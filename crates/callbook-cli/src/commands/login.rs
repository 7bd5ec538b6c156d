use crate::backend::{firestore_config, sign_in};
use crate::commands::print_json;
use anyhow::Result;
use callbook_config::AppConfig;
use clap::Args;
use serde::Serialize;

/// The password is read from the environment variable named by
/// `firestore.password_env` (default `CALLBOOK_PASSWORD`).
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Overrides firestore.email from the config
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginReport {
    email: String,
    local_id: String,
    project_id: String,
}

pub fn login(config: &AppConfig, json: bool, args: LoginArgs) -> Result<()> {
    let firestore = firestore_config(config)?;
    let session = sign_in(firestore, args.email)?;

    if json {
        return print_json(&LoginReport {
            email: session.email,
            local_id: session.local_id,
            project_id: firestore.project_id.clone(),
        });
    }
    println!(
        "signed in as {} (project {})",
        session.email, firestore.project_id
    );
    Ok(())
}
