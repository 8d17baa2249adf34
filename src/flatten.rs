//! Turn the category tree into the ordered rows a chart draws, honouring
//! which categories are expanded.

use std::collections::BTreeSet;

use crate::models::Category;

/// Names of the categories whose subcategories are shown.
pub type ExpandedSet = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderRow {
    Category {
        name: String,
        amount: f64,
        has_children: bool,
        expanded: bool,
    },
    Subcategory {
        parent: String,
        name: String,
        amount: f64,
    },
}

impl RenderRow {
    pub fn name(&self) -> &str {
        match self {
            Self::Category { name, .. } | Self::Subcategory { name, .. } => name,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Self::Category { amount, .. } | Self::Subcategory { amount, .. } => *amount,
        }
    }

    pub fn is_subordinate(&self) -> bool {
        matches!(self, Self::Subcategory { .. })
    }
}

/// One row per category in order; an expanded category with subcategories
/// is followed directly by one row per subcategory.
pub fn flatten(categories: &[Category], expanded: &ExpandedSet) -> Vec<RenderRow> {
    let mut rows = Vec::with_capacity(categories.len());
    for category in categories {
        let has_children = category.has_subcategories();
        let is_open = has_children && expanded.contains(&category.name);
        rows.push(RenderRow::Category {
            name: category.name.clone(),
            amount: category.total_amount,
            has_children,
            expanded: is_open,
        });
        if !is_open {
            continue;
        }
        for sub in category.subcategories.iter().flatten() {
            rows.push(RenderRow::Subcategory {
                parent: category.name.clone(),
                name: sub.label.clone(),
                amount: sub.amount,
            });
        }
    }
    rows
}

/// The expanded set after clicking `row`. Only category rows with at least
/// one subcategory toggle; anything else returns the set unchanged.
pub fn toggle(categories: &[Category], expanded: &ExpandedSet, row: &RenderRow) -> ExpandedSet {
    match row {
        RenderRow::Category { name, .. } => toggle_name(categories, expanded, name),
        RenderRow::Subcategory { .. } => expanded.clone(),
    }
}

pub fn toggle_name(categories: &[Category], expanded: &ExpandedSet, name: &str) -> ExpandedSet {
    let mut next = expanded.clone();
    let expandable = categories
        .iter()
        .any(|c| c.name == name && c.has_subcategories());
    if !expandable {
        return next;
    }
    if !next.remove(name) {
        next.insert(name.to_string());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subcategory;

    fn category(name: &str, total: f64, subs: &[(&str, f64)]) -> Category {
        Category {
            name: name.to_string(),
            total_amount: total,
            subcategories: (!subs.is_empty()).then(|| {
                subs.iter()
                    .map(|(label, amount)| Subcategory {
                        label: label.to_string(),
                        amount: *amount,
                    })
                    .collect()
            }),
        }
    }

    fn tree() -> Vec<Category> {
        vec![
            category("Food", 150.0, &[("Other", 100.0), ("Lunch", 50.0)]),
            category("Rent", 120.0, &[]),
            category("Fun", 40.0, &[("Movies", 25.0), ("Games", 15.0)]),
        ]
    }

    fn names(rows: &[RenderRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_collapsed_yields_one_row_per_category() {
        let rows = flatten(&tree(), &ExpandedSet::new());
        assert_eq!(names(&rows), vec!["Food", "Rent", "Fun"]);
        assert!(rows.iter().all(|r| !r.is_subordinate()));
        assert_eq!(
            rows[0],
            RenderRow::Category {
                name: "Food".into(),
                amount: 150.0,
                has_children: true,
                expanded: false,
            }
        );
    }

    #[test]
    fn test_toggle_inserts_children_after_parent() {
        let cats = tree();
        let rows = flatten(&cats, &ExpandedSet::new());
        let expanded = toggle(&cats, &ExpandedSet::new(), &rows[2]);
        let rows = flatten(&cats, &expanded);
        assert_eq!(names(&rows), vec!["Food", "Rent", "Fun", "Movies", "Games"]);
        assert!(rows[3].is_subordinate() && rows[4].is_subordinate());
        assert_eq!(rows[3].amount(), 25.0);
        match &rows[4] {
            RenderRow::Subcategory { parent, .. } => assert_eq!(parent, "Fun"),
            other => panic!("expected subcategory row, got {other:?}"),
        }
    }

    #[test]
    fn test_toggle_twice_collapses() {
        let cats = tree();
        let once = toggle_name(&cats, &ExpandedSet::new(), "Food");
        assert!(once.contains("Food"));
        let twice = toggle_name(&cats, &once, "Food");
        assert!(twice.is_empty());
    }

    #[test]
    fn test_toggle_ignores_childless_and_subordinate_rows() {
        let cats = tree();
        let expanded = toggle_name(&cats, &ExpandedSet::new(), "Rent");
        assert!(expanded.is_empty());

        let open = toggle_name(&cats, &ExpandedSet::new(), "Food");
        let rows = flatten(&cats, &open);
        let child = rows.iter().find(|r| r.is_subordinate()).unwrap();
        assert_eq!(toggle(&cats, &open, child), open);
    }

    #[test]
    fn test_expanded_names_without_children_are_ignored() {
        let cats = tree();
        let expanded: ExpandedSet = ["Rent".to_string(), "Gone".to_string()].into_iter().collect();
        let rows = flatten(&cats, &expanded);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_toggle_unknown_category_is_noop() {
        let expanded = toggle_name(&tree(), &ExpandedSet::new(), "Nope");
        assert!(expanded.is_empty());
    }

    #[test]
    fn test_flatten_empty() {
        assert!(flatten(&[], &ExpandedSet::new()).is_empty());
    }
}
