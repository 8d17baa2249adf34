//! Category breakdown: filter transactions, then group them by name with
//! their notes as subcategories.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::models::{Category, Filters, Subcategory, Transaction};

/// Label of the bucket that collects unnoted amounts once a category has
/// noted ones.
pub const OTHER_LABEL: &str = "Other";

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn add_to(subs: &mut Vec<Subcategory>, label: &str, amount: f64) {
    match subs.iter_mut().find(|s| s.label == label) {
        Some(sub) => sub.amount += amount,
        None => subs.push(Subcategory {
            label: label.to_string(),
            amount,
        }),
    }
}

/// Fold one transaction into an existing category.
fn accumulate(category: &mut Category, txn: &Transaction) {
    let before = category.total_amount;
    category.total_amount += txn.amount;
    let note = txn.note.trim();

    if note.is_empty() {
        if let Some(subs) = &mut category.subcategories {
            add_to(subs, OTHER_LABEL, txn.amount);
        }
    } else if let Some(subs) = &mut category.subcategories {
        add_to(subs, note, txn.amount);
    } else {
        // First noted transaction: everything seen so far becomes "Other".
        category.subcategories = Some(vec![
            Subcategory {
                label: OTHER_LABEL.to_string(),
                amount: before,
            },
            Subcategory {
                label: note.to_string(),
                amount: txn.amount,
            },
        ]);
    }
}

fn open_category(txn: &Transaction) -> Category {
    let note = txn.note.trim();
    Category {
        name: txn.name.clone(),
        total_amount: txn.amount,
        subcategories: (!note.is_empty()).then(|| {
            vec![Subcategory {
                label: note.to_string(),
                amount: txn.amount,
            }]
        }),
    }
}

/// Group the transactions that pass `filters` into categories, largest
/// first. Subcategories are sorted the same way. Ties keep first-seen order.
///
/// Whenever a category has subcategories their amounts add up to its total.
pub fn aggregate(transactions: &[Transaction], filters: &Filters) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in transactions.iter().filter(|t| filters.admits(t)) {
        match index.get(txn.name.as_str()) {
            Some(&i) => accumulate(&mut categories[i], txn),
            None => {
                index.insert(txn.name.as_str(), categories.len());
                categories.push(open_category(txn));
            }
        }
    }

    for category in &mut categories {
        if let Some(subs) = &mut category.subcategories {
            subs.sort_by(|a, b| descending(a.amount, b.amount));
        }
    }
    categories.sort_by(|a, b| descending(a.total_amount, b.total_amount));

    debug!(
        transactions = transactions.len(),
        categories = categories.len(),
        filters = %filters.describe(),
        "aggregated"
    );
    categories
}

/// Sum of all category totals.
pub fn grand_total(categories: &[Category]) -> f64 {
    categories.iter().map(|c| c.total_amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, Kind, KindFilter};

    fn txn(date: &str, name: &str, note: &str, amount: f64, kind: Kind) -> Transaction {
        Transaction {
            date: date.to_string(),
            icon: String::new(),
            name: name.to_string(),
            note: note.to_string(),
            amount,
            currency: "KES".to_string(),
            kind,
            recurring: String::new(),
            destination_icon: None,
        }
    }

    fn expense(name: &str, note: &str, amount: f64) -> Transaction {
        txn("2024-01-15", name, note, amount, Kind::Expense)
    }

    fn all() -> Filters {
        Filters {
            range: DateRange::default(),
            kind: KindFilter::All,
        }
    }

    fn subs(c: &Category) -> Vec<(&str, f64)> {
        c.subcategories
            .as_ref()
            .map(|s| s.iter().map(|s| (s.label.as_str(), s.amount)).collect())
            .unwrap_or_default()
    }

    fn assert_conserved(categories: &[Category]) {
        for c in categories {
            if let Some(s) = &c.subcategories {
                let sum: f64 = s.iter().map(|s| s.amount).sum();
                assert_eq!(sum, c.total_amount, "category {}", c.name);
            }
        }
    }

    #[test]
    fn test_bootstrap_buckets_prior_amounts_into_other() {
        let cats = aggregate(&[expense("Food", "", 100.0), expense("Food", "Lunch", 50.0)], &all());
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].total_amount, 150.0);
        assert_eq!(subs(&cats[0]), vec![("Other", 100.0), ("Lunch", 50.0)]);
    }

    #[test]
    fn test_unnoted_categories_have_no_subcategories() {
        let cats = aggregate(&[expense("Rent", "", 900.0), expense("Rent", "  ", 100.0)], &all());
        assert_eq!(cats[0].total_amount, 1000.0);
        assert_eq!(cats[0].subcategories, None);
        assert!(!cats[0].has_subcategories());
    }

    #[test]
    fn test_first_noted_transaction_seeds_subcategories() {
        let cats = aggregate(&[expense("Food", "Lunch", 30.0)], &all());
        assert_eq!(subs(&cats[0]), vec![("Lunch", 30.0)]);
    }

    #[test]
    fn test_unnoted_after_noted_creates_other() {
        let cats = aggregate(
            &[expense("Food", "Lunch", 30.0), expense("Food", "", 20.0), expense("Food", "", 5.0)],
            &all(),
        );
        assert_eq!(subs(&cats[0]), vec![("Lunch", 30.0), ("Other", 25.0)]);
        assert_conserved(&cats);
    }

    #[test]
    fn test_matching_notes_merge_and_trim() {
        let cats = aggregate(
            &[
                expense("Food", "Lunch", 30.0),
                expense("Food", " Lunch ", 10.0),
                expense("Food", "Dinner", 60.0),
            ],
            &all(),
        );
        assert_eq!(subs(&cats[0]), vec![("Dinner", 60.0), ("Lunch", 40.0)]);
    }

    #[test]
    fn test_categories_sorted_descending_and_stable() {
        let cats = aggregate(
            &[
                expense("A", "", 10.0),
                expense("B", "", 50.0),
                expense("C", "", 10.0),
                expense("D", "", 10.0),
            ],
            &all(),
        );
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn test_subcategory_ties_keep_insertion_order() {
        let cats = aggregate(
            &[expense("Food", "Tea", 5.0), expense("Food", "Bread", 5.0), expense("Food", "Milk", 9.0)],
            &all(),
        );
        assert_eq!(subs(&cats[0]), vec![("Milk", 9.0), ("Tea", 5.0), ("Bread", 5.0)]);
    }

    #[test]
    fn test_kind_filter() {
        let txns = vec![
            expense("Food", "", 10.0),
            txn("2024-01-31", "Salary", "", 500.0, Kind::Income),
        ];
        let only = |kind| Filters { range: DateRange::default(), kind };
        assert_eq!(aggregate(&txns, &only(KindFilter::Expense)).len(), 1);
        assert_eq!(aggregate(&txns, &only(KindFilter::Income))[0].name, "Salary");
        assert_eq!(aggregate(&txns, &only(KindFilter::All)).len(), 2);
    }

    #[test]
    fn test_date_range_inclusive_and_drops_bad_dates() {
        let txns = vec![
            txn("2024-01-01", "Start", "", 1.0, Kind::Expense),
            txn("2024-01-31", "End", "", 2.0, Kind::Expense),
            txn("2024-02-01", "After", "", 3.0, Kind::Expense),
            txn("not-a-date", "Broken", "", 4.0, Kind::Expense),
        ];
        let filters = Filters {
            range: DateRange::new(Some("2024-01-01".into()), Some("2024-01-31".into())),
            kind: KindFilter::All,
        };
        let names: Vec<String> = aggregate(&txns, &filters).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["End", "Start"]);

        // Without an active range the malformed row is kept.
        assert_eq!(aggregate(&txns, &all()).len(), 4);
    }

    #[test]
    fn test_filter_idempotent() {
        let txns = vec![
            expense("Food", "Lunch", 30.0),
            expense("Food", "", 20.0),
            txn("2024-03-01", "Rent", "", 900.0, Kind::Expense),
            txn("2024-01-31", "Salary", "", 500.0, Kind::Income),
        ];
        let filters = Filters {
            range: DateRange::new(Some("2024-01-01".into()), Some("2024-02-01".into())),
            kind: KindFilter::Expense,
        };
        let once = aggregate(&txns, &filters);
        let twice = aggregate(&txns, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_conservation_across_filters() {
        let mut txns = Vec::new();
        let notes = ["", "Lunch", "", "Dinner", "Lunch", "", "Snacks"];
        for (i, note) in notes.iter().enumerate() {
            let day = format!("2024-01-{:02}", i + 1);
            let kind = if i % 3 == 0 { Kind::Income } else { Kind::Expense };
            txns.push(txn(&day, "Food", note, (i as f64 + 1.0) * 10.0, kind));
            txns.push(txn(&day, "Fun", notes[notes.len() - 1 - i], 7.0, Kind::Expense));
        }
        for kind in [KindFilter::All, KindFilter::Expense, KindFilter::Income] {
            for (start, end) in [(None, None), (Some("2024-01-02"), Some("2024-01-05"))] {
                let filters = Filters {
                    range: DateRange::new(start.map(String::from), end.map(String::from)),
                    kind,
                };
                assert_conserved(&aggregate(&txns, &filters));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], &Filters::default()).is_empty());
        assert_eq!(grand_total(&[]), 0.0);
    }
}
