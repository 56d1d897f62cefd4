// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Evomap CLI entrypoint.
//!
//! Opens the map collection stored in a directory (the current one by default) and runs the
//! interactive TUI on it. Logs go to `<store>/evomap.log`, filtered by `EVOMAP_LOG`.

use std::error::Error;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use evomap::route::{FileRouteSink, NullRouteSink};
use evomap::store::{FileStore, KeyValueStore, MemoryStore, WriteDurability};
use evomap::workspace::Workspace;

const LOG_ENV: &str = "EVOMAP_LOG";
const LOG_FILE: &str = "evomap.log";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--route <fragment>] [--durable-writes] [--reset-storage]\n  {program} [--store <dir>] [--route <fragment>] [--durable-writes] [--reset-storage]\n  {program} --demo [--route <fragment>]\n\nIf store-dir/--store is omitted, the current working directory is used.\n--demo keeps maps in memory only and cannot be combined with store-dir/--store.\n--route opens the map addressed by a `#/map/<id>` fragment instead of the last one shown.\n--reset-storage forgets every saved map before starting.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nSet {LOG_ENV} (e.g. `debug`, `evomap=trace`) to change what is logged to <store>/{LOG_FILE}."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    store_dir: Option<String>,
    route: Option<String>,
    durable_writes: bool,
    reset_storage: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.store_dir = Some(dir);
            }
            "--route" => {
                if options.route.is_some() {
                    return Err(());
                }
                let fragment = args.next().ok_or(())?;
                options.route = Some(fragment);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--reset-storage" => {
                if options.reset_storage {
                    return Err(());
                }
                options.reset_storage = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(arg);
            }
        }
    }

    if options.demo && options.store_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_logging(dir: &Path) -> Result<WorkerGuard, Box<dyn Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn Error>)?;
    Ok(guard)
}

fn open_workspace(options: CliOptions) -> Result<Workspace, Box<dyn Error>> {
    if options.demo {
        tracing::info!("starting demo session; nothing is persisted");
        return Ok(Workspace::open(
            Box::new(MemoryStore::new()),
            Box::new(NullRouteSink),
            options.route.as_deref(),
        )?);
    }

    let dir = PathBuf::from(options.store_dir.unwrap_or_else(|| ".".to_owned()));
    let store = if options.durable_writes {
        FileStore::new(&dir).with_durability(WriteDurability::Durable)
    } else {
        FileStore::new(&dir)
    };

    let mut kv = store.clone();
    if options.reset_storage {
        evomap::store::reset(&mut kv)?;
    }

    let router = FileRouteSink::new(store);
    let route = options.route.or_else(|| router.remembered());
    tracing::info!(dir = %dir.display(), route = route.as_deref().unwrap_or(""), "opening maps");

    let kv: Box<dyn KeyValueStore> = Box::new(kv);
    Ok(Workspace::open(kv, Box::new(router), route.as_deref())?)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "evomap".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let log_dir = if options.demo {
            std::env::temp_dir()
        } else {
            PathBuf::from(options.store_dir.as_deref().unwrap_or("."))
        };
        std::fs::create_dir_all(&log_dir)?;
        let _log_guard = init_logging(&log_dir)?;

        let workspace = open_workspace(options)?;
        evomap::tui::run(workspace)
    })();

    if let Err(err) = result {
        eprintln!("evomap: {err}");
        std::process::exit(1);
    }
}
