//! Command implementations for the minidic CLI.

use std::sync::Arc;

use log::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dictionary::{Catalog, Cursor, LoadPolicy, StoreConfig};
use crate::error::{MinidicError, Result};
use crate::query::QueryService;
use crate::server::{self, ServerConfig};
use crate::storage::file::FileStorageConfig;
use crate::storage::{Storage, StorageConfig, StorageFactory};

/// Execute a CLI command.
pub fn execute_command(args: MinidicArgs) -> Result<()> {
    match &args.command {
        Command::Serve(serve_args) => serve(serve_args.clone(), &args),
        Command::List(list_args) => list_dictionaries(list_args.clone(), &args),
        Command::Open(open_args) => open_dictionary(open_args.clone(), &args),
        Command::Entries(entries_args) => show_entries(entries_args.clone(), &args),
        Command::Nearest(nearest_args) => show_nearest(nearest_args.clone(), &args),
        Command::Browse(browse_args) => browse(browse_args.clone(), &args),
    }
}

fn open_storage(cli_args: &MinidicArgs) -> Result<Arc<dyn Storage>> {
    let config = StorageConfig::File(FileStorageConfig::new(&cli_args.dictionary_dir));
    StorageFactory::create(config)
}

fn build_service(cli_args: &MinidicArgs, load_policy: LoadPolicy) -> Result<QueryService> {
    let storage = open_storage(cli_args)?;
    Ok(QueryService::from_storage(
        storage,
        StoreConfig { load_policy },
    ))
}

/// Serve queries over HTTP until interrupted.
fn serve(args: ServeArgs, cli_args: &MinidicArgs) -> Result<()> {
    let service = build_service(cli_args, args.load_policy.into())?;
    if service.catalog().is_empty() {
        warn!(
            "No dictionaries found in {}",
            cli_args.dictionary_dir.display()
        );
    }

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        allow_shutdown: args.allow_shutdown,
    };

    if cli_args.verbosity() > 0 {
        println!(
            "Serving {} dictionaries from {} on http://{}/",
            service.catalog().len(),
            cli_args.dictionary_dir.display(),
            config.bind_addr()
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(&config, service))
}

/// List the catalog.
fn list_dictionaries(args: ListArgs, cli_args: &MinidicArgs) -> Result<()> {
    let storage = open_storage(cli_args)?;
    let catalog = Catalog::scan(&storage);

    let dictionaries = catalog
        .names()
        .iter()
        .cloned()
        .map(|name| {
            let bytes = if args.long {
                storage.file_size(&name).ok()
            } else {
                None
            };
            CatalogItem { name, bytes }
        })
        .collect();

    output_result(
        "Dictionaries",
        &CatalogListing {
            directory: cli_args.dictionary_dir.display().to_string(),
            dictionaries,
        },
        cli_args,
    )
}

/// Load a dictionary and report its size.
fn open_dictionary(args: OpenArgs, cli_args: &MinidicArgs) -> Result<()> {
    let service = build_service(cli_args, LoadPolicy::Explicit)?;
    let info = service.store().load(&args.name)?;
    info!("Opened {} ({} entries)", info.name, info.size);

    output_result(
        "Dictionary loaded",
        &OpenResult {
            name: info.name,
            size: info.size,
        },
        cli_args,
    )
}

fn entries_page(service: &QueryService, name: &str, start: i64, end: i64) -> Result<EntriesResult> {
    let lines = service.store().get_range(name, start, end)?;
    let entries = lines
        .iter()
        .enumerate()
        .map(|(offset, line)| EntryView::new(start + offset as i64, line))
        .collect();

    Ok(EntriesResult {
        name: name.to_string(),
        start,
        end,
        entries,
    })
}

/// Print a range of entries.
fn show_entries(args: EntriesArgs, cli_args: &MinidicArgs) -> Result<()> {
    let service = build_service(cli_args, LoadPolicy::Explicit)?;
    service.store().load(&args.name)?;

    let result = entries_page(&service, &args.name, args.start, args.end)?;
    output_result("Entries", &result, cli_args)
}

/// Print the entry nearest to a word.
fn show_nearest(args: NearestArgs, cli_args: &MinidicArgs) -> Result<()> {
    let service = build_service(cli_args, LoadPolicy::Explicit)?;
    let dictionary = service.store().load_dictionary(&args.name)?;

    let position = service.store().find_nearest(&args.name, &args.term)?;
    let entry = dictionary
        .entry(position)
        .map(|line| EntryView::new(position as i64, line));

    output_result(
        "Nearest entry",
        &NearestResult {
            name: args.name,
            term: args.term,
            position,
            entry,
        },
        cli_args,
    )
}

/// Print one or more pages starting from a chosen position.
fn browse(args: BrowseArgs, cli_args: &MinidicArgs) -> Result<()> {
    if args.pages == 0 {
        return Err(MinidicError::invalid_argument("--pages must be at least 1"));
    }

    let service = build_service(cli_args, LoadPolicy::Explicit)?;
    let info = service.store().load(&args.name)?;

    let mut cursor = Cursor::new(info.size, args.page_size)?;
    if let Some(term) = &args.at {
        cursor = cursor.at(service.store().find_nearest(&args.name, term)?);
    } else if args.last {
        cursor.last();
    }
    for _ in 0..args.back {
        cursor.previous();
    }

    let mut pages = Vec::with_capacity(args.pages);
    loop {
        let (start, end) = cursor.page();
        pages.push(entries_page(&service, &args.name, start, end)?);
        if pages.len() == args.pages || !cursor.next() {
            break;
        }
    }

    output_result(
        "Browse",
        &BrowseResult {
            name: info.name,
            size: info.size,
            pages,
        },
        cli_args,
    )
}
