//! Interactive front-end: type a domain, watch the lookup run, browse and
//! re-run prior queries. Consumes `execute_query` as a single call and
//! renders whatever `QueryResult` comes back; no pipeline knowledge here.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use btksorgu_client::execute_query;
use btksorgu_core::{is_valid_domain, AppConfig, QueryResult};

use crate::history;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const COURT_COLUMN_WIDTH: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Input,
    Querying,
    Result,
    History,
}

pub async fn run(api_key: String, config: AppConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal even when a draw panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let mut app = App::new(api_key, config, history::default_path());
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

struct App {
    view: View,
    input: String,
    error: Option<String>,
    results: Vec<QueryResult>,
    table: TableState,
    query_domain: String,
    /// Index of the history row being re-queried; `None` for a new query.
    refreshing: Option<usize>,
    spinner: usize,
    should_quit: bool,
    api_key: String,
    config: AppConfig,
    history_path: PathBuf,
}

impl App {
    fn new(api_key: String, config: AppConfig, history_path: PathBuf) -> Self {
        let results = history::load(&history_path);
        let mut table = TableState::default();
        if !results.is_empty() {
            table.select(Some(0));
        }
        Self {
            view: View::Input,
            input: String::new(),
            error: None,
            results,
            table,
            query_domain: String::new(),
            refreshing: None,
            spinner: 0,
            should_quit: false,
            api_key,
            config,
            history_path,
        }
    }

    async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<QueryResult>();
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(Duration::from_millis(100));

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(Ok(event)) = events.next() => {
                    if let Event::Key(key) = event {
                        if key.kind == KeyEventKind::Press {
                            self.handle_key(key.code, key.modifiers, &result_tx);
                        }
                    }
                }
                Some(result) = result_rx.recv() => {
                    self.apply_result(result);
                }
                _ = tick.tick() => {
                    if self.view == View::Querying {
                        self.spinner = (self.spinner + 1) % SPINNER_FRAMES.len();
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        tx: &mpsc::UnboundedSender<QueryResult>,
    ) {
        // No cancellation mid-pipeline; quitting waits for the query.
        if self.view == View::Querying {
            return;
        }

        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.results.is_empty() {
                    self.results.clear();
                    self.table.select(None);
                    self.save_history();
                    self.view = View::Input;
                }
            }
            KeyCode::Char('q') if self.view != View::Input => {
                self.should_quit = true;
            }
            KeyCode::Tab => match self.view {
                View::Input if !self.results.is_empty() => {
                    self.view = View::History;
                    if self.table.selected().is_none() {
                        self.table.select(Some(0));
                    }
                }
                View::History => self.view = View::Input,
                _ => {}
            },
            KeyCode::Esc => {
                if matches!(self.view, View::Result | View::History) {
                    self.view = View::Input;
                }
            }
            KeyCode::Enter => self.handle_enter(tx),
            KeyCode::Up if self.view == View::History => self.move_selection(-1),
            KeyCode::Down if self.view == View::History => self.move_selection(1),
            KeyCode::Backspace if self.view == View::Input => {
                self.input.pop();
            }
            KeyCode::Char(c) if self.view == View::Input => {
                self.input.push(c);
            }
            _ => {}
        }
    }

    fn handle_enter(&mut self, tx: &mpsc::UnboundedSender<QueryResult>) {
        match self.view {
            View::Input => {
                let domain = self.input.trim().to_string();
                if domain.is_empty() {
                    return;
                }
                if is_valid_domain(&domain) {
                    self.error = None;
                    self.start_query(domain, None, tx);
                } else {
                    self.error = Some(format!("geçersiz domain: {domain}"));
                }
            }
            View::History => {
                if let Some(idx) = self.table.selected() {
                    if let Some(result) = self.results.get(idx) {
                        let domain = result.domain.clone();
                        self.start_query(domain, Some(idx), tx);
                    }
                }
            }
            View::Result => {
                self.input.clear();
                self.error = None;
                self.view = View::Input;
            }
            View::Querying => {}
        }
    }

    fn start_query(
        &mut self,
        domain: String,
        refreshing: Option<usize>,
        tx: &mpsc::UnboundedSender<QueryResult>,
    ) {
        self.view = View::Querying;
        self.query_domain = domain.clone();
        self.refreshing = refreshing;
        self.spinner = 0;

        let tx = tx.clone();
        let api_key = self.api_key.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            let result = execute_query(&domain, &api_key, &config).await;
            let _ = tx.send(result);
        });
    }

    fn apply_result(&mut self, result: QueryResult) {
        self.view = View::Result;

        if !result.status {
            // Failures are shown but not recorded in history.
            self.error = Some(result.error);
            self.refreshing = None;
            return;
        }

        self.error = None;
        match self.refreshing.take() {
            Some(idx) if idx < self.results.len() => self.results[idx] = result,
            _ => self.results.push(result),
        }
        self.save_history();
    }

    fn save_history(&self) {
        if let Err(e) = history::save(&self.history_path, &self.results) {
            tracing::warn!(error = %e, "history could not be saved");
        }
    }

    fn move_selection(&mut self, delta: i64) {
        if self.results.is_empty() {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, self.results.len() as i64 - 1);
        self.table.select(Some(next as usize));
    }

    // -- Rendering --

    fn render(&mut self, frame: &mut Frame) {
        let [title_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            format!(" BTK Site Sorgulama v{} ", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, title_area);

        match self.view {
            View::Input | View::History => self.render_input(frame, body_area),
            View::Querying => self.render_querying(frame, body_area),
            View::Result => self.render_result(frame, body_area),
        }

        frame.render_widget(
            Paragraph::new(self.help_line()).style(Style::default().fg(Color::DarkGray)),
            help_area,
        );
    }

    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let [input_area, error_area, table_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(area);

        let input_focused = self.view == View::Input;
        let border_style = if input_focused {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(self.input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title("Domain girin"),
        );
        frame.render_widget(input, input_area);
        if input_focused {
            frame.set_cursor_position((
                input_area.x + 1 + self.input.chars().count() as u16,
                input_area.y + 1,
            ));
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                error_area,
            );
        }

        if !self.results.is_empty() {
            self.render_table(frame, table_area, !input_focused);
        }
    }

    fn render_querying(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                SPINNER_FRAMES[self.spinner],
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(" Sorgulanıyor: "),
            Span::styled(
                self.query_domain.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_result(&mut self, frame: &mut Frame, area: Rect) {
        let [detail_area, table_area] =
            Layout::vertical([Constraint::Length(12), Constraint::Min(0)]).areas(area);

        let mut lines = Vec::new();
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("Hata: {error}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        } else if let Some(result) = self.results.last() {
            lines.push(Line::from(format!("Domain: {}", result.domain)));
            lines.push(Line::from(format!(
                "Süre: {}",
                result.query_duration_formatted
            )));
            lines.push(Line::from(""));
            if result.blocked {
                lines.push(Line::from(Span::styled(
                    "DURUM: ENGELLİ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
                if !result.decision_date.is_empty() {
                    lines.push(Line::from(format!("Karar Tarihi: {}", result.decision_date)));
                }
                if !result.file_number.is_empty() {
                    lines.push(Line::from(format!("Dosya No: {}", result.file_number)));
                }
                if !result.court.is_empty() {
                    lines.push(Line::from(format!("Mahkeme: {}", result.court)));
                }
            } else {
                lines.push(Line::from(Span::styled(
                    "DURUM: ERİŞİLEBİLİR",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from("Bu site hakkında engel kararı bulunmamaktadır."));
            }
        }

        let detail = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(detail, detail_area);

        if self.results.len() > 1 {
            self.render_table(frame, table_area, false);
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let rows: Vec<Row> = self.results.iter().map(result_row).collect();

        let header = Row::new(vec!["Domain", "Durum", "Süre", "Mahkeme"]).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        );

        let highlight = if focused {
            Style::default().bg(Color::Indexed(57)).fg(Color::Indexed(229))
        } else {
            Style::default()
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(25),
                Constraint::Length(15),
                Constraint::Length(10),
                Constraint::Length(30),
            ],
        )
        .header(header)
        .row_highlight_style(highlight)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Geçmiş Sorgular"),
        );

        frame.render_stateful_widget(table, area, &mut self.table);
    }

    fn help_line(&self) -> &'static str {
        match self.view {
            View::Input if self.results.is_empty() => "[Enter] Sorgula • [Ctrl+C] Çıkış",
            View::Input => {
                "[Enter] Sorgula • [Tab] Geçmiş • [Ctrl+D] Temizle • [Ctrl+C] Çıkış"
            }
            View::History => {
                "[Enter] Seçiliyi Yenile • [Tab/Esc] Geri • [Ctrl+D] Temizle • [Q] Çıkış"
            }
            View::Querying => "Sorgu sürüyor...",
            View::Result => "[Enter] Yeni Sorgu • [Esc] Geri • [Q] Çıkış",
        }
    }
}

fn result_row(result: &QueryResult) -> Row<'_> {
    let (label, color) = status_label(result);
    Row::new(vec![
        Cell::from(result.domain.as_str()),
        Cell::from(Span::styled(label, Style::default().fg(color))),
        Cell::from(result.query_duration_formatted.as_str()),
        Cell::from(court_cell(&result.court)),
    ])
}

fn status_label(result: &QueryResult) -> (&'static str, Color) {
    if !result.status {
        ("Hata", Color::Red)
    } else if result.blocked {
        ("Engelli", Color::Red)
    } else {
        ("Erişilebilir", Color::Green)
    }
}

/// Char-boundary-safe truncation for the court column (Turkish letters are
/// multi-byte).
fn court_cell(court: &str) -> String {
    if court.is_empty() {
        return "-".to_string();
    }
    if court.chars().count() <= COURT_COLUMN_WIDTH {
        return court.to_string();
    }
    let truncated: String = court.chars().take(COURT_COLUMN_WIDTH).collect();
    format!("{truncated}...")
}
