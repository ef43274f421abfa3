//! Data file initialisation command (`helixdesk init`).

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

use helixdesk::backend::store::{Document, FlatFileStore};
use helixdesk::seed;

pub fn cmd_init(data_file: &Path, with_seed: bool, force: bool) -> Result<()> {
    if data_file.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite it.",
            data_file.display()
        );
    }

    let doc = if with_seed {
        seed::demo_document()
    } else {
        Document::default()
    };

    // `open` only writes when the file is missing; write explicitly so
    // --force replaces an existing document.
    let store = FlatFileStore::open(data_file)
        .with_context(|| format!("Failed to open {}", data_file.display()))?;
    store
        .write(&doc)
        .with_context(|| format!("Failed to write {}", data_file.display()))?;

    info!(
        path = %data_file.display(),
        customers = doc.customers.len(),
        tasks = doc.kanban.tasks.len(),
        "data file initialised"
    );
    println!("Initialized HelixDesk data at {}", data_file.display());
    if with_seed {
        println!(
            "  {} customers, {} columns, {} tasks",
            doc.customers.len(),
            doc.kanban.column_order.len(),
            doc.kanban.tasks.len()
        );
    }
    Ok(())
}
