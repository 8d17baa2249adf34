use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use tencents::aggregate::grand_total;
use tencents::error::Result;
use tencents::flatten::{flatten, RenderRow};
use tencents::fmt::{bar, money};
use tencents::models::Category;
use tencents::session::Session;

use crate::tui::{
    self, View, ViewAction, BAR_STYLE, CATEGORY_STYLE, FOOTER_STYLE, HEADER_STYLE,
    SELECTED_STYLE, SUBCATEGORY_STYLE, SUB_BAR_STYLE,
};

const NAME_WIDTH: u16 = 30;
const AMOUNT_WIDTH: u16 = 18;

#[derive(Debug, PartialEq, Eq)]
pub enum BrowseAction {
    Continue,
    Close,
}

/// Interactive bar chart over a session: categories, with the notes of
/// expanded categories listed beneath them.
pub struct ChartBrowser {
    session: Session,
    label: String,
    categories: Vec<Category>,
    rows: Vec<RenderRow>,
    selected: usize,
    status_message: Option<String>,
    table_state: TableState,
}

impl ChartBrowser {
    pub fn new(session: Session, label: String) -> Self {
        let mut browser = Self {
            session,
            label,
            categories: Vec::new(),
            rows: Vec::new(),
            selected: 0,
            status_message: None,
            table_state: TableState::default(),
        };
        browser.refresh();
        browser
    }

    /// Recompute categories and rows from the session's current state.
    fn refresh(&mut self) {
        self.categories = self.session.categories();
        self.rows = flatten(&self.categories, &self.session.expanded());
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[RenderRow] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&RenderRow> {
        self.rows.get(self.selected)
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> Result<()> {
        if self.session.transactions().is_empty() {
            println!("No saved transactions. Run `tencents load <file>` first.");
            return Ok(());
        }
        tui::run_view(self)
    }

    fn toggle_selected(&mut self) {
        let Some(row) = self.rows.get(self.selected).cloned() else {
            return;
        };
        if let RenderRow::Category { has_children: false, name, .. } = &row {
            self.status_message = Some(format!("No notes under {name}"));
            return;
        }
        self.session.toggle(&row);
        self.refresh();
    }

    fn collapse_selected(&mut self) {
        match self.rows.get(self.selected).cloned() {
            Some(RenderRow::Category { expanded: true, .. }) => self.toggle_selected(),
            Some(RenderRow::Subcategory { parent, .. }) => {
                if let Some(idx) = self.rows.iter().position(
                    |r| matches!(r, RenderRow::Category { name, .. } if *name == parent),
                ) {
                    self.selected = idx;
                    self.toggle_selected();
                }
            }
            _ => {}
        }
    }

    /// Draw the browser into the given frame.
    pub fn draw_frame(&mut self, frame: &mut Frame) {
        let areas = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Fill(1),   // chart
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(frame.area());
        let (title_area, table_area, status_area, keys_area) = (areas[0], areas[1], areas[2], areas[3]);

        let title = match self.session.source() {
            Some(source) => format!("Ten Cents: {source}"),
            None => "Ten Cents".to_string(),
        };
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), title_area);

        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new("No transactions found. Press r to reset filters."),
                table_area,
            );
        } else {
            let bar_width = table_area.width.saturating_sub(NAME_WIDTH + AMOUNT_WIDTH + 2) as usize;
            let max = self
                .categories
                .iter()
                .map(|c| c.total_amount)
                .fold(0.0_f64, f64::max);

            let rendered: Vec<Row> = self
                .rows
                .iter()
                .map(|row| {
                    let (name, name_style, bar_style) = match row {
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
                            (format!("{marker} {name}"), CATEGORY_STYLE, BAR_STYLE)
                        }
                        RenderRow::Subcategory { name, .. } => {
                            (format!("  \u{2514}\u{2500} {name}"), SUBCATEGORY_STYLE, SUB_BAR_STYLE)
                        }
                    };
                    Row::new(vec![
                        Cell::from(Span::styled(name, name_style)),
                        Cell::from(tui::money_span(&self.label, row.amount(), name_style)),
                        Cell::from(Span::styled(bar(row.amount(), max, bar_width), bar_style)),
                    ])
                })
                .collect();

            self.table_state.select(Some(self.selected));
            let table = Table::new(
                rendered,
                [
                    Constraint::Length(NAME_WIDTH),
                    Constraint::Length(AMOUNT_WIDTH),
                    Constraint::Fill(1),
                ],
            )
            .header(Row::new(vec!["Category", "Amount", ""]).style(HEADER_STYLE).bottom_margin(1))
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);
            frame.render_stateful_widget(table, table_area, &mut self.table_state);
        }

        let mut status = format!(
            "{} categories | Total: {} | {}",
            self.categories.len(),
            money(&self.label, grand_total(&self.categories)),
            self.session.filters().describe(),
        );
        if let Some(ref msg) = self.status_message {
            status.push_str(" | ");
            status.push_str(msg);
        }
        frame.render_widget(Paragraph::new(status).style(FOOTER_STYLE), status_area);

        frame.render_widget(
            Paragraph::new(Line::from(
                "\u{2191}/\u{2193}:select  Enter/Space:toggle  \u{2192}/\u{2190}:open/close  k:kind  r:reset  q:quit",
            ))
            .style(FOOTER_STYLE),
            keys_area,
        );
    }

    /// Handle a key event. Returns a BrowseAction indicating what the caller should do.
    pub fn handle_key_event(&mut self, code: KeyCode) -> BrowseAction {
        self.status_message = None;
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return BrowseAction::Close,
            KeyCode::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.rows.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Right => {
                if matches!(
                    self.selected_row(),
                    Some(RenderRow::Category { has_children: true, expanded: false, .. })
                ) {
                    self.toggle_selected();
                }
            }
            KeyCode::Left => self.collapse_selected(),
            KeyCode::Char('k') => {
                let mut filters = self.session.filters().clone();
                filters.kind = filters.kind.next();
                self.session.set_filters(filters);
                self.refresh();
                self.status_message = Some(format!("Showing {}", self.session.filters().kind));
            }
            KeyCode::Char('r') => {
                self.session.reset_filters();
                self.refresh();
                self.status_message = Some("Filters reset".to_string());
            }
            _ => {}
        }
        BrowseAction::Continue
    }
}

impl View for ChartBrowser {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_frame(frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match self.handle_key_event(code) {
            BrowseAction::Close => ViewAction::Close,
            BrowseAction::Continue => ViewAction::Continue,
        }
    }
}
