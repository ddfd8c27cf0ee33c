use anyhow::{bail, Context};
use colored::Colorize;
use docrest_db::{Db, DocumentDb, JsonResource, Resource};
use docrest_store::{DocumentStore, JsonFileStore};
use docrest_types::CollectionPath;
use serde_json::{json, Value};

use crate::cli::*;
use crate::config::CliConfig;

/// Result of one command, rendered by [`print_outcome`].
#[derive(Debug)]
pub enum Outcome {
    Resources(Vec<JsonResource>),
    Resource(JsonResource),
    Done(String),
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(&cli.config)?;
    let store_path = cli.store.clone().unwrap_or(config.store_path);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("could not open store {}", store_path.display()))?;
    let db = DocumentDb::with_config(store, config.db);

    let outcome = execute(&db, cli.command)?;
    print_outcome(outcome, cli.format)
}

pub fn execute<S: DocumentStore>(db: &DocumentDb<S>, command: Command) -> anyhow::Result<Outcome> {
    match command {
        Command::List(args) => {
            let segments = parse_segments(&args.path)?;
            Ok(Outcome::Resources(db.list(&JsonResource::default(), &segments)?))
        }
        Command::Get(args) => {
            let segments = parse_segments(&args.path)?;
            Ok(Outcome::Resource(db.get(&JsonResource::default(), &segments)?))
        }
        Command::Post(args) => {
            let segments = parse_segments(&args.path)?;
            let resource = keyed(&segments, &args.json, args.key)?;
            Ok(Outcome::Resource(db.post(&resource, &segments)?))
        }
        Command::Put(args) => {
            let segments = parse_segments(&args.path)?;
            let resource = keyed(&segments, &args.json, args.key)?;
            Ok(Outcome::Resource(db.put(&resource, &segments)?))
        }
        Command::Patch(args) => {
            let segments = parse_segments(&args.path)?;
            let resource = keyed(&segments, &args.json, Some(args.key))?;
            Ok(Outcome::Resource(db.patch(&resource)?))
        }
        Command::Delete(args) => {
            let segments = parse_segments(&args.path)?;
            let witness = JsonResource::default().with_children(args.children);
            db.delete(&witness, &segments)?;
            Ok(Outcome::Done(format!("Deleted {}", args.path)))
        }
        Command::Clear(args) => {
            let segments = parse_segments(&args.path)?;
            let witness = JsonResource::default().with_children(args.children);
            db.clear(&witness, &segments)?;
            Ok(Outcome::Done(format!("Cleared {}", args.path)))
        }
    }
}

/// Split a command-line path into segments.
fn parse_segments(raw: &str) -> anyhow::Result<Vec<String>> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw)
            .with_context(|| format!("path is not a JSON array of strings: {raw}"));
    }
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        bail!("empty path");
    }
    Ok(trimmed.split('/').map(str::to_string).collect())
}

fn keyed(segments: &[String], raw_json: &str, key: Option<String>) -> anyhow::Result<JsonResource> {
    let value: Value = serde_json::from_str(raw_json).context("document is not valid JSON")?;
    let resource = JsonResource::from_json(value)?;
    Ok(match key {
        Some(field) => {
            let collection = CollectionPath::new(segments)?;
            resource.with_key(collection, field)
        }
        None => resource,
    })
}

fn document_json(resource: &JsonResource) -> Value {
    json!({
        "path": resource.path().map(ToString::to_string),
        "fields": resource.fields(),
    })
}

pub fn print_outcome(outcome: Outcome, format: OutputFormat) -> anyhow::Result<()> {
    match (outcome, format) {
        (Outcome::Resources(items), OutputFormat::Json) => {
            let docs: Vec<Value> = items.iter().map(document_json).collect();
            println!("{}", serde_json::to_string_pretty(&docs)?);
        }
        (Outcome::Resources(items), OutputFormat::Text) => {
            if items.is_empty() {
                println!("{}", "No documents.".dimmed());
            }
            let fields = JsonResource::serialize_list(&items)?;
            for (item, fields) in items.iter().zip(fields) {
                print_document(item, &Value::Object(fields))?;
            }
        }
        (Outcome::Resource(item), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&document_json(&item))?);
        }
        (Outcome::Resource(item), OutputFormat::Text) => {
            let fields = Value::Object(item.fields().clone());
            print_document(&item, &fields)?;
        }
        (Outcome::Done(message), OutputFormat::Json) => {
            println!("{}", json!({ "ok": true, "message": message }));
        }
        (Outcome::Done(message), OutputFormat::Text) => {
            println!("{} {}", "✓".green().bold(), message);
        }
    }
    Ok(())
}

fn print_document(item: &JsonResource, fields: &Value) -> anyhow::Result<()> {
    let path = item.path().map(ToString::to_string).unwrap_or_default();
    println!("{}", path.yellow().bold());
    for line in serde_json::to_string_pretty(fields)?.lines() {
        println!("  {line}");
    }
    Ok(())
}
