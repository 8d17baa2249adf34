use std::path::PathBuf;

use tencents::error::Result;
use tencents::export::{write_csv, DEFAULT_EXPORT_NAME};
use tencents::settings::{load_settings, shellexpand_path};
use tencents::store;

pub fn run(output: Option<String>) -> Result<()> {
    let settings = load_settings();
    let conn = store::open(&settings.data_path())?;
    let txns = store::load_transactions(&conn)?;

    let path = match output {
        Some(p) => PathBuf::from(shellexpand_path(&p)),
        None => settings.data_path().join("exports").join(DEFAULT_EXPORT_NAME),
    };
    write_csv(&txns, &path)?;
    println!("Exported {} transactions to {}", txns.len(), path.display());
    Ok(())
}
