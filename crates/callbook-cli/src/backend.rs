use anyhow::{Context as _, Result};
use callbook_config::{AppConfig, BackendKind, FirestoreConfig};
use callbook_remote::{FirestoreBackend, FirestoreSettings, PasswordSignIn, Session};
use callbook_store::{paths, CallStore, DocumentBackend, SqliteBackend};
use std::env;
use std::path::PathBuf;
use tracing::debug;

use crate::error::invalid_input;

pub type Store = CallStore<Box<dyn DocumentBackend>>;

/// Opens the configured backend. An explicit `--db-path` always selects the
/// local SQLite file.
pub fn open_store(config: &AppConfig, db_path: Option<PathBuf>) -> Result<Store> {
    let backend: Box<dyn DocumentBackend> = match (db_path, config.store.backend) {
        (Some(path), _) => Box::new(open_sqlite(Some(path))?),
        (None, BackendKind::Sqlite) => Box::new(open_sqlite(config.store.path.clone())?),
        (None, BackendKind::Firestore) => {
            let firestore = firestore_config(config)?;
            let session = sign_in(firestore, None)?;
            Box::new(open_firestore(firestore, &session)?)
        }
    };
    Ok(CallStore::new(backend))
}

fn open_sqlite(path: Option<PathBuf>) -> Result<SqliteBackend> {
    let db_path = paths::resolve_db_path(path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let backend = SqliteBackend::open(&db_path)
        .with_context(|| format!("open database {}", db_path.display()))?;
    backend.migrate().with_context(|| "run migrations")?;
    Ok(backend)
}

fn open_firestore(config: &FirestoreConfig, session: &Session) -> Result<FirestoreBackend> {
    let settings = FirestoreSettings {
        project_id: config.project_id.clone(),
        collection: config.collection.clone(),
        endpoint: config.endpoint.clone(),
    };
    FirestoreBackend::connect(settings, session)
        .with_context(|| format!("connect to firestore project {}", config.project_id))
}

pub fn firestore_config(config: &AppConfig) -> Result<&FirestoreConfig> {
    config
        .firestore
        .as_ref()
        .ok_or_else(|| invalid_input("no [firestore] section in config"))
}

/// Signs in with `email` (or the configured one) and the password read from
/// the configured environment variable.
pub fn sign_in(config: &FirestoreConfig, email: Option<String>) -> Result<Session> {
    let email = email
        .or_else(|| config.email.clone())
        .ok_or_else(|| invalid_input("no sign-in email: pass --email or set firestore.email"))?;
    let password = env::var(&config.password_env)
        .map_err(|_| invalid_input(format!("missing env var {}", config.password_env)))?;

    let mut auth = PasswordSignIn::new(config.api_key.clone());
    if let Some(endpoint) = &config.auth_endpoint {
        auth = auth.with_endpoint(endpoint.clone());
    }
    let session = auth
        .sign_in(&email, &password)
        .with_context(|| format!("sign in as {}", email.trim()))?;
    debug!(email = %session.email, "session established");
    Ok(session)
}
