use tencents::error::Result;
use tencents::settings::{load_settings, settings_path};
use tencents::store::{self, DB_FILE};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = settings.data_path();
    let db_path = data_dir.join(DB_FILE);

    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Currency:   {}", settings.currency_label);
    println!("Showing:    {}", settings.kind_filter());

    if db_path.exists() {
        let conn = store::open(&data_dir)?;
        let saved = store::load_transactions(&conn)?.len();
        println!();
        println!("Saved transactions:  {saved}");
        match store::last_import(&conn)? {
            Some(last) => {
                println!("Last load:           {} ({} rows, {})", last.filename, last.record_count, last.imported_at);
                if let (Some(start), Some(end)) = (&last.date_range_start, &last.date_range_end) {
                    println!("Covering:            {start} to {end}");
                }
            }
            None => println!("Last load:           (none)"),
        }
    } else {
        println!();
        println!("Nothing saved yet. Run `tencents load <file>` to start.");
    }

    Ok(())
}
