use colored::Colorize;
use comfy_table::{Cell, Table};

use super::FilterArgs;
use tencents::aggregate::{aggregate, grand_total};
use tencents::error::Result;
use tencents::flatten::{flatten, ExpandedSet, RenderRow};
use tencents::fmt::{bar, money};
use tencents::models::Category;
use tencents::settings::load_settings;
use tencents::store;

const BAR_WIDTH: usize = 30;

pub fn run(filter: &FilterArgs, expand: &[String], expand_all: bool) -> Result<()> {
    let settings = load_settings();
    let filters = filter.to_filters(&settings)?;
    let conn = store::open(&settings.data_path())?;
    let txns = store::load_transactions(&conn)?;

    if txns.is_empty() {
        println!("No saved transactions. Run `tencents load <file>` first.");
        return Ok(());
    }

    let categories = aggregate(&txns, &filters);
    if categories.is_empty() {
        println!("No transactions found ({}).", filters.describe());
        return Ok(());
    }

    let expanded: ExpandedSet = if expand_all {
        categories
            .iter()
            .filter(|c| c.has_subcategories())
            .map(|c| c.name.clone())
            .collect()
    } else {
        expand.iter().cloned().collect()
    };

    println!("{} ({})", "Spending by category".bold(), filters.describe());
    println!("{}", render(&categories, &expanded, &settings.currency_label));
    Ok(())
}

/// The breakdown as a table: one line per rendered row, then the total.
pub(crate) fn render(categories: &[Category], expanded: &ExpandedSet, label: &str) -> Table {
    let rows = flatten(categories, expanded);
    let max = categories
        .iter()
        .map(|c| c.total_amount)
        .fold(0.0_f64, f64::max);

    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", ""]);

    for row in &rows {
        let name = match row {
            RenderRow::Category {
                name,
                has_children,
                expanded,
                ..
            } => {
                let marker = match (has_children, expanded) {
                    (true, true) => "\u{25be}",
                    (true, false) => "\u{25b8}",
                    _ => " ",
                };
                Cell::new(format!("{marker} {name}").bold())
            }
            RenderRow::Subcategory { name, .. } => Cell::new(format!("  \u{2514}\u{2500} {name}").dimmed()),
        };
        let graph = bar(row.amount(), max, BAR_WIDTH);
        let graph = if row.is_subordinate() {
            graph.cyan()
        } else {
            graph.green()
        };
        table.add_row(vec![name, Cell::new(money(label, row.amount())), Cell::new(graph)]);
    }

    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(label, grand_total(categories)).bold()),
        Cell::new(""),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tencents::models::Subcategory;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                name: "Food".into(),
                total_amount: 300.0,
                subcategories: Some(vec![
                    Subcategory { label: "Other".into(), amount: 200.0 },
                    Subcategory { label: "Lunch".into(), amount: 100.0 },
                ]),
            },
            Category {
                name: "Rent".into(),
                total_amount: 900.0,
                subcategories: None,
            },
        ]
    }

    #[test]
    fn test_render_collapsed_hides_notes() {
        let out = render(&categories(), &ExpandedSet::new(), "KES").to_string();
        assert!(out.contains("Food"));
        assert!(out.contains("Rent"));
        assert!(!out.contains("Lunch"));
        assert!(out.contains("1,200.00"));
    }

    #[test]
    fn test_render_expanded_shows_notes() {
        let expanded: ExpandedSet = ["Food".to_string()].into_iter().collect();
        let out = render(&categories(), &expanded, "KES").to_string();
        assert!(out.contains("Lunch"));
        assert!(out.contains("Other"));
        assert!(out.contains("KES 200.00"));
    }
}
