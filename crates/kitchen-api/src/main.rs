use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use kitchen_api::{ingest_document, respond, respond_ok, status, KitchenConfig, SandboxService};
use kitchen_sandbox::SandboxCoordinator;
use kitchen_store::{FsContentStore, MemoryStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("kitchen")
        .version(kitchen_api::VERSION)
        .about("Configuration-document ingestion and sandbox staging")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("normalize")
                .about("Normalize a resource body and print it")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON document to normalize"),
                ),
        )
        .subcommand(
            Command::new("stage")
                .about("Create a sandbox against a directory of uploaded files")
                .arg(
                    Arg::new("request")
                        .long("request")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Sandbox request body ({\"checksums\": {...}})"),
                )
                .arg(
                    Arg::new("store")
                        .long("store")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory holding uploaded files named by checksum"),
                )
                .arg(
                    Arg::new("commit")
                        .long("commit")
                        .action(ArgAction::SetTrue)
                        .help("Commit the sandbox after creating it"),
                ),
        )
}

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn normalize(args: &ArgMatches) -> Result<bool> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing document path")?;
    let body = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let resp = respond_ok(ingest_document(&body));
    print_json(&resp.body)?;
    Ok(resp.is_success())
}

async fn stage(args: &ArgMatches, config: KitchenConfig) -> Result<bool> {
    let request = args
        .get_one::<PathBuf>("request")
        .context("missing request path")?;
    let store = args
        .get_one::<PathBuf>("store")
        .context("missing store directory")?;
    let body = std::fs::read(request).with_context(|| format!("reading {}", request.display()))?;

    let coordinator = SandboxCoordinator::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FsContentStore::new(store)),
    )
    .with_config(config.sandbox);
    let mut service = SandboxService::new(coordinator);
    if let Some(base_url) = config.base_url {
        service = service.with_base_url(base_url);
    }

    let created = service.create(&body).await;
    let sandbox_id = created.as_ref().ok().map(|c| c.sandbox_id.clone());
    let resp = respond(status::CREATED, created);
    print_json(&resp.body)?;
    if !resp.is_success() {
        return Ok(false);
    }

    if let (true, Some(id)) = (args.get_flag("commit"), sandbox_id) {
        let resp = respond_ok(service.commit(&id, br#"{"is_completed": true}"#).await);
        print_json(&resp.body)?;
        return Ok(resp.is_success());
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let format = matches
        .get_one::<String>("log-format")
        .map_or("text", String::as_str);
    init_tracing(format);

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => KitchenConfig::load(path)?,
        None => KitchenConfig::default(),
    };

    let success = match matches.subcommand() {
        Some(("normalize", args)) => normalize(args)?,
        Some(("stage", args)) => stage(args, config).await?,
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
        None => anyhow::bail!("no subcommand given"),
    };

    std::process::exit(if success { 0 } else { 1 });
}
