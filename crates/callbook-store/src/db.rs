use crate::error::{Result, StoreError};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens (or creates) the call database. The file is left readable by its
/// owner only since it holds customer contact details.
pub fn open(path: &Path) -> Result<Connection> {
    if path.is_dir() {
        return Err(StoreError::InvalidDataPath(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure(&conn, "wal")?;
    restrict_db_permissions(path)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn, "memory")?;
    Ok(conn)
}

fn configure(conn: &Connection, journal_mode: &str) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let applied: String =
        conn.pragma_update_and_check(None, "journal_mode", journal_mode, |row| row.get(0))?;
    if !applied.eq_ignore_ascii_case(journal_mode) {
        tracing::debug!(requested = journal_mode, applied = %applied, "journal mode not applied");
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

#[cfg(unix)]
fn restrict_db_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_db_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
