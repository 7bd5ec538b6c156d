use anyhow::Result;
use callbook_config::AppConfig;
use serde::Serialize;
use std::io::{self, Write};

use crate::backend::Store;

pub mod calls;
pub mod charts;
pub mod completions;
pub mod login;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
