use colored::Colorize;
use comfy_table::{Cell, Table};

use tencents::error::{Result, TenCentsError};
use tencents::fmt::money;
use tencents::models::Kind;
use tencents::settings::load_settings;
use tencents::store;

pub fn list(search: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let conn = store::open(&settings.data_path())?;
    let txns = store::load_transactions(&conn)?;

    let hits = store::search_transactions(&txns, search.unwrap_or(""));
    if hits.is_empty() {
        match search {
            Some(term) => println!("No saved transactions match '{term}'."),
            None => println!("No saved transactions."),
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Name", "Note", "Amount", "Type"]);
    for (i, t) in &hits {
        let kind = match t.kind {
            Kind::Expense => t.kind.as_str().red(),
            Kind::Income => t.kind.as_str().green(),
        };
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&t.date),
            Cell::new(&t.name),
            Cell::new(&t.note),
            Cell::new(money(&settings.currency_label, t.amount)),
            Cell::new(kind),
        ]);
    }
    println!("{table}");
    println!("{} of {} saved transactions", hits.len(), txns.len());
    Ok(())
}

pub fn delete(index: usize) -> Result<()> {
    let settings = load_settings();
    let conn = store::open(&settings.data_path())?;
    let removed = store::remove_at(&conn, index)?;
    println!(
        "Deleted #{index}: {} {} {}",
        removed.date,
        removed.name,
        money(&settings.currency_label, removed.amount)
    );
    Ok(())
}

pub fn clear(yes: bool) -> Result<()> {
    let settings = load_settings();
    let conn = store::open(&settings.data_path())?;
    let count = store::load_transactions(&conn)?.len();
    if count == 0 {
        println!("Nothing to clear.");
        return Ok(());
    }
    if !yes {
        return Err(TenCentsError::Other(format!(
            "This deletes all {count} saved transactions. Re-run with --yes to confirm."
        )));
    }
    store::clear_transactions(&conn)?;
    println!("Cleared {count} saved transactions.");
    Ok(())
}
