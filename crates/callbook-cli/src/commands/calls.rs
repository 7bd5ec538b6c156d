use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{optional_text, parse_call_id, parse_revision, report_offset};
use anyhow::{Context as _, Result};
use callbook_core::time::format_timestamp_datetime;
use callbook_core::{validate, validate_patch, CallDraft, CallPatch, CallRecord};
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub customer_name: String,
    #[arg(long)]
    pub customer_phone: String,
    #[arg(long)]
    pub customer_email: String,
    #[arg(long)]
    pub call_status: String,
    /// Call length in whole minutes (1-60)
    #[arg(long, value_name = "MINUTES")]
    pub duration: String,
    #[arg(long)]
    pub agent_name: String,
    #[arg(long)]
    pub comments: Option<String>,
    /// Opaque reference to an attached photo
    #[arg(long, value_name = "URI")]
    pub photo: Option<String>,
}

/// Pass an empty value to `--comments` or `--photo` to clear it.
#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub customer_name: Option<String>,
    #[arg(long)]
    pub customer_phone: Option<String>,
    #[arg(long)]
    pub customer_email: Option<String>,
    #[arg(long)]
    pub call_status: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    pub duration: Option<String>,
    #[arg(long)]
    pub agent_name: Option<String>,
    #[arg(long)]
    pub comments: Option<String>,
    #[arg(long, value_name = "URI")]
    pub photo: Option<String>,
    /// Fail instead of overwriting if the call changed since this revision
    #[arg(long, value_name = "REVISION")]
    pub if_revision: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Serialize)]
struct EditReport {
    id: String,
    revision: String,
}

pub fn add_call(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let draft = CallDraft {
        customer_name: args.customer_name,
        customer_phone: args.customer_phone,
        customer_email: args.customer_email,
        call_status: args.call_status,
        comments: args.comments,
        duration_minutes: args.duration,
        agent_name: args.agent_name,
        photo_uri: args.photo,
    };
    let fields = validate(&draft)?;
    let record = ctx.store.create(&fields).with_context(|| "save call")?;

    if ctx.json {
        print_json(&record)?;
    } else {
        println!("created {} {}", record.id, record.fields.customer_name);
    }
    Ok(())
}

pub fn list_calls(ctx: &Context<'_>) -> Result<()> {
    let records = ctx.store.list_all().with_context(|| "list calls")?;
    if ctx.json {
        return print_json(&records);
    }

    if records.is_empty() {
        println!("no calls recorded");
        return Ok(());
    }
    let offset = report_offset(ctx.config.report.timezone);
    for record in &records {
        let fields = &record.fields;
        println!(
            "{}  {}  {}  {}  {} min  {}",
            record.id,
            format_timestamp_datetime(record.created_at, offset),
            fields.customer_name,
            fields.call_status,
            fields.duration_minutes,
            fields.agent_name
        );
    }
    Ok(())
}

pub fn show_call(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_call_id(&args.id)?;
    let record = ctx
        .store
        .get(&id)
        .with_context(|| format!("load call {}", id))?
        .ok_or_else(|| not_found(format!("call {}", id)))?;

    if ctx.json {
        return print_json(&record);
    }
    print_record(ctx, &record);
    Ok(())
}

pub fn edit_call(ctx: &Context<'_>, args: EditArgs) -> Result<()> {
    let id = parse_call_id(&args.id)?;
    let expected = args.if_revision.as_deref().map(parse_revision).transpose()?;

    let patch = CallPatch {
        customer_name: args.customer_name,
        customer_phone: args.customer_phone,
        customer_email: args.customer_email,
        call_status: args.call_status,
        comments: args.comments,
        duration_minutes: args.duration,
        agent_name: args.agent_name,
        photo_uri: args.photo,
    };
    if patch.is_empty() {
        return Err(invalid_input("no updates provided"));
    }
    let patch = validate_patch(&patch)?;

    let revision = match &expected {
        Some(expected) => ctx.store.update_if_revision(&id, expected, &patch),
        None => ctx.store.update(&id, &patch),
    }
    .with_context(|| format!("update call {}", id))?;

    if ctx.json {
        return print_json(&EditReport {
            id: id.to_string(),
            revision: revision.to_string(),
        });
    }
    println!("updated {} (revision {})", id, revision);
    Ok(())
}

pub fn delete_call(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_call_id(&args.id)?;
    ctx.store
        .delete(&id)
        .with_context(|| format!("delete call {}", id))?;
    if ctx.json {
        return print_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    println!("deleted {}", id);
    Ok(())
}

fn print_record(ctx: &Context<'_>, record: &CallRecord) {
    let offset = report_offset(ctx.config.report.timezone);
    let fields = &record.fields;
    println!("id:        {}", record.id);
    println!("customer:  {}", fields.customer_name);
    println!("phone:     {}", fields.customer_phone);
    println!("email:     {}", fields.customer_email);
    println!("status:    {}", fields.call_status);
    println!("duration:  {} min", fields.duration_minutes);
    println!("agent:     {}", fields.agent_name);
    println!("comments:  {}", optional_text(&fields.comments));
    println!("photo:     {}", optional_text(&fields.photo_uri));
    println!(
        "created:   {}",
        format_timestamp_datetime(record.created_at, offset)
    );
    println!("revision:  {}", record.revision);
}
