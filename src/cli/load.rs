use std::path::PathBuf;

use tencents::error::Result;
use tencents::importer::{compute_checksum, date_span, read_csv_file};
use tencents::session::{LoadOutcome, Session};
use tencents::settings::{load_settings, shellexpand_path};
use tencents::store;

pub fn run(file: &str) -> Result<()> {
    let settings = load_settings();
    let path = PathBuf::from(shellexpand_path(file));
    let conn = store::open(&settings.data_path())?;

    let mut session = Session::new(settings.amount_policy(), settings.kind_filter())
        .with_transactions(store::load_transactions(&conn)?);

    let ticket = session.begin_load();
    let content = read_csv_file(&path);
    let checksum = content.as_ref().ok().map(|text| compute_checksum(text));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string());

    match session.complete_load(ticket, &filename, content)? {
        LoadOutcome::Stale => {
            println!("Load of {filename} was superseded; nothing changed.");
        }
        LoadOutcome::Applied { count } => {
            let txns = session.transactions();
            let checksum = checksum.unwrap_or_default();
            let repeat = store::last_import(&conn)?.is_some_and(|last| last.checksum == checksum);

            store::save_transactions(&conn, &txns)?;
            let span = date_span(&txns);
            match &span {
                Some((start, end)) => println!("Loaded {count} transactions from {filename} ({start} to {end})"),
                None => println!("Loaded {count} transactions from {filename}"),
            }
            if repeat {
                println!("  Same contents as the previous load.");
            }
            store::record_import(&conn, &filename, &checksum, count, span)?;
        }
    }
    Ok(())
}
