use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use eco_budget::{
    spending_breakdown, validate, CategoryShare, ExpenseForm, RecordStore, StoreError, ECO_TIPS,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

// ============================================================================
// SCREENS
// ============================================================================

/// The screens of the shell. One is active at a time; every failure path
/// drops the user back where they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    CaptureForm,
    Summary,
    TipsPopup,
}

impl Screen {
    pub fn title(&self) -> &str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::CaptureForm => "Log Your Expense",
            Screen::Summary => "Spending Breakdown",
            Screen::TipsPopup => "Eco Tips",
        }
    }
}

// ============================================================================
// CAPTURE FORM STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    Category,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Amount,
        FormField::Category,
        FormField::Date,
    ];

    pub fn next(&self) -> Self {
        match self {
            FormField::Name => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Date,
            FormField::Date => FormField::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Name => FormField::Date,
            FormField::Amount => FormField::Name,
            FormField::Category => FormField::Amount,
            FormField::Date => FormField::Category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormField::Name => "Expense Name",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Date => "Date (YYYY-MM-DD)",
        }
    }
}

/// Text of the four inputs plus which one has focus. The form owns its own
/// state and is wiped after a successful save.
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: ExpenseForm,
    pub focus: FormField,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            fields: ExpenseForm::default(),
            focus: FormField::Name,
        }
    }
}

impl FormState {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.fields.name,
            FormField::Amount => &self.fields.amount,
            FormField::Category => &self.fields.category,
            FormField::Date => &self.fields.date,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.fields.name,
            FormField::Amount => &mut self.fields.amount,
            FormField::Category => &mut self.fields.category,
            FormField::Date => &mut self.fields.date,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.value_mut(self.focus).push(c);
    }

    pub fn backspace(&mut self) {
        self.value_mut(self.focus).pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn clear(&mut self) {
        *self = FormState::default();
    }
}

// ============================================================================
// STATUS LINE
// ============================================================================

/// What the status bar is telling the user. The original application used
/// message boxes for these; here they live on one line under the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Info(String),
    Success(String),
    Error(String),
}

impl StatusLine {
    fn text(&self) -> &str {
        match self {
            StatusLine::Info(msg) | StatusLine::Success(msg) | StatusLine::Error(msg) => msg,
        }
    }

    fn color(&self) -> Color {
        match self {
            StatusLine::Info(_) => Color::Cyan,
            StatusLine::Success(_) => Color::Green,
            StatusLine::Error(_) => Color::Red,
        }
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    store: RecordStore,
    pub screen: Screen,
    pub form: FormState,
    pub breakdown: Vec<CategoryShare>,
    pub status: Option<StatusLine>,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            screen: Screen::Dashboard,
            form: FormState::default(),
            breakdown: Vec::new(),
            status: None,
        }
    }

    pub fn open_capture_form(&mut self) {
        self.status = None;
        self.screen = Screen::CaptureForm;
    }

    pub fn open_tips(&mut self) {
        self.status = None;
        self.screen = Screen::TipsPopup;
    }

    pub fn back_to_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
    }

    pub fn cancel_capture(&mut self) {
        self.status = None;
        self.screen = Screen::Dashboard;
    }

    /// Validate the form and append the record. Validation and I/O failures
    /// keep the form (and its text) on screen; success wipes it and returns
    /// to the dashboard.
    pub fn save_expense(&mut self) {
        let record = match validate(&self.form.fields) {
            Ok(record) => record,
            Err(err) => {
                self.status = Some(StatusLine::Error(err.to_string()));
                return;
            }
        };

        match self.store.append(&record) {
            Ok(()) => {
                self.form.clear();
                self.status = Some(StatusLine::Success("Expense saved successfully!".to_string()));
                self.screen = Screen::Dashboard;
            }
            Err(err) => {
                self.status = Some(StatusLine::Error(err.to_string()));
            }
        }
    }

    /// Reload the store and recompute the breakdown. A store that was never
    /// written stays on the dashboard with an informational message.
    pub fn open_summary(&mut self) {
        match self.store.load_all() {
            Ok(records) => {
                self.breakdown = spending_breakdown(&records);
                self.status = None;
                self.screen = Screen::Summary;
            }
            Err(StoreError::NotFound(_)) => {
                self.status = Some(StatusLine::Info(
                    "No expenses found! Please add some first.".to_string(),
                ));
            }
            Err(err) => {
                self.status = Some(StatusLine::Error(err.to_string()));
            }
        }
    }

    pub fn grand_total(&self) -> f64 {
        self.breakdown.iter().map(|share| share.total).sum()
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.screen {
                Screen::Dashboard => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('a') => app.open_capture_form(),
                    KeyCode::Char('s') => app.open_summary(),
                    KeyCode::Char('t') => app.open_tips(),
                    _ => {}
                },
                Screen::CaptureForm => match key.code {
                    KeyCode::Esc => app.cancel_capture(),
                    KeyCode::Enter => app.save_expense(),
                    KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
                    KeyCode::BackTab | KeyCode::Up => app.form.focus_previous(),
                    KeyCode::Backspace => app.form.backspace(),
                    KeyCode::Char(c) => app.form.insert_char(c),
                    _ => {}
                },
                Screen::Summary => match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('b') | KeyCode::Char('q') => {
                        app.back_to_dashboard()
                    }
                    _ => {}
                },
                Screen::TipsPopup => match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('t') | KeyCode::Char('q') => {
                        app.back_to_dashboard()
                    }
                    _ => {}
                },
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.screen {
        Screen::Dashboard => render_dashboard(f, chunks[1]),
        Screen::CaptureForm => render_form(f, chunks[1], app),
        Screen::Summary => render_summary(f, chunks[1], app),
        Screen::TipsPopup => {
            // The popup floats over the dashboard, like the original Toplevel
            render_dashboard(f, chunks[1]);
            render_tips_popup(f, chunks[1]);
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "🌱 Eco-Friendly Budget Tracker",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  │  "),
        Span::styled(
            app.screen.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED),
        ),
    ])];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        menu_line("a", "Add Expense"),
        menu_line("s", "Eco Summary"),
        menu_line("t", "Eco Tips"),
        menu_line("q", "Exit"),
    ];

    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Dashboard "),
    );

    f.render_widget(menu, area);
}

fn menu_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(action.to_string()),
    ])
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Log Your Expense ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    for (i, field) in FormField::ALL.iter().enumerate() {
        let focused = app.form.focus == *field;

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let mut value = app.form.value(*field).to_string();
        if focused {
            value.push('▏'); // cursor
        }

        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", field.label())),
        );

        f.render_widget(input, chunks[i]);
    }
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    if app.breakdown.is_empty() {
        let empty = Paragraph::new("No spending recorded yet.").block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Spending Breakdown by Category "),
        );
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Category", "Total", "Share", ""].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.breakdown.iter().map(|share| {
        let bar_width = (share.percent.max(0.0) / 100.0 * 20.0).round() as usize;

        let cells = vec![
            Cell::from(truncate(&share.category, 24)),
            Cell::from(format!("{:.2}", share.total)),
            Cell::from(format!("{:.1}%", share.percent)),
            Cell::from("█".repeat(bar_width)).style(Style::default().fg(Color::Green)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(22),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(
                " Spending Breakdown by Category (total {:.2}) ",
                app.grand_total()
            )),
    );

    f.render_widget(table, area);
}

fn render_tips_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(area, 50, ECO_TIPS.len() as u16 + 4);

    let mut lines = vec![Line::from(Span::styled(
        "Sustainable Budgeting Tips:",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(""));
    for (i, tip) in ECO_TIPS.iter().enumerate() {
        lines.push(Line::from(format!("{}. {}", i + 1, tip)));
    }

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Eco Tips "),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let spans = match &app.status {
        Some(status) => vec![Span::styled(
            format!(" {} ", status.text()),
            Style::default()
                .fg(status.color())
                .add_modifier(Modifier::BOLD),
        )],
        None => key_hints(app.screen),
    };

    let status = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(status, area);
}

fn key_hints(screen: Screen) -> Vec<Span<'static>> {
    let hints: &[(&str, &str)] = match screen {
        Screen::Dashboard => &[("a", "Add"), ("s", "Summary"), ("t", "Tips"), ("q", "Quit")],
        Screen::CaptureForm => &[
            ("Enter", "Save"),
            ("Tab", "Next field"),
            ("Esc", "Back"),
        ],
        Screen::Summary | Screen::TipsPopup => &[("Esc", "Back")],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    spans
}

// ============================================================================
// HELPERS
// ============================================================================

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = area.width * width_percent / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn app_with_store(dir: &tempfile::TempDir) -> App {
        App::new(RecordStore::new(dir.path().join("expenses.csv")))
    }

    fn type_into(form: &mut FormState, field: FormField, text: &str) {
        form.focus = field;
        for c in text.chars() {
            form.insert_char(c);
        }
    }

    fn fill_valid_expense(app: &mut App) {
        type_into(&mut app.form, FormField::Name, "Groceries");
        type_into(&mut app.form, FormField::Amount, "42.50");
        type_into(&mut app.form, FormField::Category, "Food");
        type_into(&mut app.form, FormField::Date, "2024-01-05");
    }

    #[test]
    fn test_dashboard_reaches_every_screen() {
        let dir = tempdir().unwrap();
        let mut app = app_with_store(&dir);
        assert_eq!(app.screen, Screen::Dashboard);

        app.open_capture_form();
        assert_eq!(app.screen, Screen::CaptureForm);
        app.cancel_capture();
        assert_eq!(app.screen, Screen::Dashboard);

        app.open_tips();
        assert_eq!(app.screen, Screen::TipsPopup);
        app.back_to_dashboard();
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_save_with_invalid_form_stays_on_form() {
        let dir = tempdir().unwrap();
        let mut app = app_with_store(&dir);

        app.open_capture_form();
        type_into(&mut app.form, FormField::Name, "Groceries");
        // amount, category, date left blank
        app.save_expense();

        assert_eq!(app.screen, Screen::CaptureForm);
        assert_eq!(
            app.status,
            Some(StatusLine::Error("All fields must be filled!".to_string()))
        );
        // Typed text is preserved so the user can fix it
        assert_eq!(app.form.value(FormField::Name), "Groceries");
        // Nothing written
        assert!(matches!(
            RecordStore::new(dir.path().join("expenses.csv")).load_all(),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_successful_save_returns_to_dashboard_and_persists() {
        let dir = tempdir().unwrap();
        let mut app = app_with_store(&dir);

        app.open_capture_form();
        fill_valid_expense(&mut app);
        app.save_expense();

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(
            app.status,
            Some(StatusLine::Success("Expense saved successfully!".to_string()))
        );
        // Form wiped for the next entry
        assert_eq!(app.form.value(FormField::Name), "");

        let records = RecordStore::new(dir.path().join("expenses.csv"))
            .load_all()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Groceries");
        assert_eq!(records[0].category, "Food");
    }

    #[test]
    fn test_summary_before_any_expense_stays_on_dashboard() {
        let dir = tempdir().unwrap();
        let mut app = app_with_store(&dir);

        app.open_summary();

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(
            app.status,
            Some(StatusLine::Info(
                "No expenses found! Please add some first.".to_string()
            ))
        );
    }

    #[test]
    fn test_summary_with_data_opens_breakdown() {
        let dir = tempdir().unwrap();
        let mut app = app_with_store(&dir);

        app.open_capture_form();
        fill_valid_expense(&mut app);
        app.save_expense();

        app.open_summary();

        assert_eq!(app.screen, Screen::Summary);
        assert_eq!(app.breakdown.len(), 1);
        assert_eq!(app.breakdown[0].category, "Food");
        assert_eq!(app.breakdown[0].total, 42.5);
        assert_eq!(app.grand_total(), 42.5);
    }

    #[test]
    fn test_form_focus_cycles_both_ways() {
        let mut form = FormState::default();
        assert_eq!(form.focus, FormField::Name);

        form.focus_next();
        assert_eq!(form.focus, FormField::Amount);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, FormField::Date);
        form.focus_next();
        assert_eq!(form.focus, FormField::Name); // wraps around

        form.focus_previous();
        assert_eq!(form.focus, FormField::Date);
    }

    #[test]
    fn test_form_editing() {
        let mut form = FormState::default();

        type_into(&mut form, FormField::Amount, "42.5");
        assert_eq!(form.value(FormField::Amount), "42.5");

        form.backspace();
        assert_eq!(form.value(FormField::Amount), "42.");

        form.clear();
        assert_eq!(form.value(FormField::Amount), "");
        assert_eq!(form.focus, FormField::Name);
    }

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate("Food", 10), "Food");
        assert_eq!(truncate("A very long category name", 10), "A very lo…");
    }
}
