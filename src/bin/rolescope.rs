//! Rolescope administrative CLI
//!
//! Run with: cargo run --features cli --bin rolescope -- roles

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rolescope::{Config, Engine, Error};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rolescope", about = "Inspect and administer roles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert missing system roles
    Seed,
    /// List roles with their effective permissions
    Roles,
    /// Show one role
    Show { role: String },
    /// Clone a role's persisted overrides into a new role
    Clone { new: String, base: String },
    /// Update tracked keys: key=value ...
    Set {
        role: String,
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Delete a custom role
    Delete { role: String },
    /// Rename a custom role
    Rename { from: String, to: String },
    /// Resolve one permission key
    Check { role: String, key: String },
    /// Resolve the view scope of a role on a resource
    Scope { role: String, resource: String },
    /// Replace an actor's reports-to list
    Manager { actor: String, managers: Vec<String> },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) => eprintln!("{}: {}", err.reason_code(), err),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env_or_yaml()?;
    let engine = Engine::open(&config).with_context(|| "open role store")?;

    match cli.command {
        Command::Seed => {
            let seeded = engine.store.ensure_seeded()?;
            println!("seeded {} role(s)", seeded.len());
        }
        Command::Roles => print_json(&engine.admin.list_roles()?)?,
        Command::Show { role } => print_json(&engine.admin.get_role(&role)?)?,
        Command::Clone { new, base } => print_json(&engine.admin.clone_role(&new, &base)?)?,
        Command::Set { role, pairs } => {
            let updates = parse_pairs(&pairs)?;
            print_json(&engine.admin.update_role(&role, &updates)?)?;
        }
        Command::Delete { role } => {
            engine.admin.delete_role(&role)?;
            println!("deleted {role}");
        }
        Command::Rename { from, to } => print_json(&engine.admin.rename_role(&from, &to)?)?,
        Command::Check { role, key } => println!("{}", engine.resolver.has(&role, &key)?),
        Command::Scope { role, resource } => {
            println!("{}", engine.resolver.scope_for(&role, &resource)?)
        }
        Command::Manager { actor, managers } => {
            engine.directory.set_managers(&actor, &managers)?;
            println!("{actor} reports to [{}]", managers.join(", "));
        }
    }
    Ok(())
}

fn parse_pairs(pairs: &[String]) -> anyhow::Result<BTreeMap<String, Value>> {
    pairs
        .iter()
        .map(|p| {
            let (k, v) = p.split_once('=').with_context(|| format!("expected key=value, got {p}"))?;
            Ok((k.to_string(), Value::String(v.to_string())))
        })
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
