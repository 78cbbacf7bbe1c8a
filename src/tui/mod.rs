//! Ratatui-based terminal dashboard.
//!
//! Five tabs over one dashboard load: quarterly overview, companies, trends,
//! reports and the assistant. Datasets load on a background thread holding a
//! `CancelToken`; quitting or reloading cancels it and its result is dropped.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap},
};
use tracing::info;

use crate::app::pipeline;
use crate::chat::{Conversation, Role, SUGGESTIONS};
use crate::data::{CancelToken, DatasetLoader};
use crate::domain::{Dashboard, Metric, QuarterlyRecord, Resource};
use crate::error::AppError;
use crate::report::{REPORTS, fmt_money};

mod plotters_chart;

use plotters_chart::{QuarterlyChart, palette};

/// Start the dashboard.
pub fn run(loader: DatasetLoader) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Arc::new(loader));
    let result = app.event_loop(&mut terminal);
    app.cancel_loading();
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Overview,
    Companies,
    Trends,
    Reports,
    Chat,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Overview, Tab::Companies, Tab::Trends, Tab::Reports, Tab::Chat];

    fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Companies => "Companies",
            Tab::Trends => "Trends",
            Tab::Reports => "Reports",
            Tab::Chat => "Assistant",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A dashboard load running on a background thread.
struct Loading {
    cancel: CancelToken,
    rx: Receiver<Option<Dashboard>>,
}

struct App {
    loader: Arc<DatasetLoader>,
    dashboard: Option<Dashboard>,
    loading: Option<Loading>,
    tab: Tab,
    metrics: Vec<Metric>,
    report: usize,
    report_scroll: u16,
    chat: Conversation,
    input: String,
    suggestion: usize,
    status: String,
}

impl App {
    fn new(loader: Arc<DatasetLoader>) -> Self {
        let mut app = Self {
            loader,
            dashboard: None,
            loading: None,
            tab: Tab::Overview,
            metrics: vec![Metric::Funding, Metric::Exits],
            report: 0,
            report_scroll: 0,
            chat: Conversation::new(),
            input: String::new(),
            suggestion: 0,
            status: String::new(),
        };
        app.start_loading();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_loading() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn start_loading(&mut self) {
        self.cancel_loading();

        let cancel = CancelToken::new();
        let (tx, rx) = mpsc::channel();
        let loader = Arc::clone(&self.loader);
        let token = cancel.clone();
        thread::spawn(move || {
            // The receiver is gone if the dashboard quit first.
            let _ = tx.send(pipeline::load_dashboard_with(&loader, &token));
        });

        self.loading = Some(Loading { cancel, rx });
        self.status = "Loading datasets...".to_string();
    }

    fn cancel_loading(&mut self) {
        if let Some(loading) = self.loading.take() {
            loading.cancel.cancel();
        }
    }

    /// Pick up a finished background load. Returns whether anything changed.
    fn poll_loading(&mut self) -> bool {
        let Some(loading) = &self.loading else {
            return false;
        };
        match loading.rx.try_recv() {
            Ok(result) => {
                self.loading = None;
                self.finish_loading(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.loading = None;
                self.status = "Loader stopped before finishing.".to_string();
                true
            }
        }
    }

    fn finish_loading(&mut self, result: Option<Dashboard>) {
        let Some(dashboard) = result else {
            self.status = "Load cancelled.".to_string();
            return;
        };
        self.status = load_summary(&dashboard);
        info!(status = %self.status, "dashboard loaded");
        self.dashboard = Some(dashboard);
    }

    /// Returns `true` when the dashboard should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.tab == Tab::Chat {
            self.handle_chat_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.prev(),
            KeyCode::Char('r') => self.start_loading(),
            KeyCode::Char(c @ '1'..='6') if self.tab == Tab::Overview => {
                self.toggle_metric(Metric::ALL[c as usize - '1' as usize]);
            }
            KeyCode::Up if self.tab == Tab::Reports => self.select_report(self.report.saturating_sub(1)),
            KeyCode::Down if self.tab == Tab::Reports => {
                self.select_report((self.report + 1).min(REPORTS.len() - 1));
            }
            KeyCode::PageDown | KeyCode::Char('j') if self.tab == Tab::Reports => {
                self.report_scroll = self.report_scroll.saturating_add(5);
            }
            KeyCode::PageUp | KeyCode::Char('k') if self.tab == Tab::Reports => {
                self.report_scroll = self.report_scroll.saturating_sub(5);
            }
            KeyCode::Char('s') if self.tab == Tab::Reports => self.save_report(),
            _ => {}
        }
        false
    }

    fn handle_chat_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.tab = Tab::Overview,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Enter => {
                let query = std::mem::take(&mut self.input);
                self.chat.ask(&query);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up => {
                self.input = SUGGESTIONS[self.suggestion].to_string();
                self.suggestion = (self.suggestion + 1) % SUGGESTIONS.len();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Toggle a chart metric; the last selected one stays on.
    fn toggle_metric(&mut self, metric: Metric) {
        let mut selected = self.metrics.clone();
        if selected.contains(&metric) {
            if selected.len() == 1 {
                return;
            }
            selected.retain(|m| *m != metric);
        } else {
            selected.push(metric);
        }
        self.metrics = Metric::ALL.into_iter().filter(|m| selected.contains(m)).collect();
    }

    fn select_report(&mut self, index: usize) {
        if index != self.report {
            self.report = index;
            self.report_scroll = 0;
        }
    }

    fn save_report(&mut self) {
        let report = &REPORTS[self.report];
        let path = PathBuf::from(report.kind.file_name());
        self.status = match crate::io::write_report_markdown(&path, report) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => format!("Save failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .block(Block::default().title("pulse: legal tech market").borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        match self.tab {
            Tab::Reports => return self.draw_reports(frame, area),
            Tab::Chat => return self.draw_chat(frame, area),
            _ => {}
        }

        let Some(dashboard) = &self.dashboard else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        match self.tab {
            Tab::Overview => self.draw_overview(frame, area, dashboard),
            Tab::Companies => draw_companies(frame, area, dashboard),
            Tab::Trends => draw_trends(frame, area, dashboard),
            Tab::Reports | Tab::Chat => {}
        }
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect, dashboard: &Dashboard) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(48)])
            .split(area);

        let block = Block::default().title("Quarterly metrics").borders(Borders::ALL);
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        frame.render_widget(Clear, inner);

        let records = &dashboard.quarterly.records;
        if records.is_empty() {
            frame.render_widget(
                Paragraph::new("No quarterly data.").style(Style::default().fg(Color::Yellow)),
                inner,
            );
        } else {
            let (series, x_bounds, y_bounds) = chart_series(records, &self.metrics);
            let labels: Vec<String> = records.iter().map(|r| r.quarter.clone()).collect();
            let widget = QuarterlyChart {
                series: &series,
                labels: &labels,
                x_bounds,
                y_bounds,
            };
            frame.render_widget(widget, inner);
        }

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled("Datasets", Style::default().add_modifier(Modifier::BOLD))));
        lines.push(Line::from(crate::report::format_status(Resource::Companies, &dashboard.companies)));
        lines.push(Line::from(crate::report::format_status(Resource::MarketTrends, &dashboard.trends)));
        lines.push(Line::from(crate::report::format_status(Resource::Quarterly, &dashboard.quarterly)));
        lines.push(Line::from(format!(
            "loaded {}",
            dashboard.generated_at.format("%Y-%m-%d %H:%M UTC")
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Metrics (1-6)", Style::default().add_modifier(Modifier::BOLD))));

        let mut color_index = 0;
        for (key, metric) in Metric::ALL.iter().enumerate() {
            let selected = self.metrics.contains(metric);
            let style = if selected {
                let (r, g, b) = palette(color_index);
                color_index += 1;
                Style::default().fg(Color::Rgb(r, g, b))
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mark = if selected { "x" } else { " " };
            lines.push(Line::from(Span::styled(
                format!("{} [{mark}] {}", key + 1, metric.display_name()),
                style,
            )));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Status").borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_reports(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        let items: Vec<ListItem> = REPORTS
            .iter()
            .map(|r| {
                ListItem::new(Text::from(vec![
                    Line::from(Span::styled(r.title, Style::default().add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(r.description, Style::default().fg(Color::Gray))),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().title("Reports").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.report));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let report = &REPORTS[self.report];
        let body = Paragraph::new(report.body)
            .wrap(Wrap { trim: false })
            .scroll((self.report_scroll, 0))
            .block(Block::default().title(report.title).borders(Borders::ALL));
        frame.render_widget(body, chunks[1]);
    }

    fn draw_chat(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let mut lines: Vec<Line> = Vec::new();
        for msg in self.chat.messages() {
            let (who, style) = match msg.role {
                Role::User => ("You", Style::default().fg(Color::Cyan)),
                Role::Assistant => ("LegalInsight AI", Style::default().fg(Color::Green)),
            };
            lines.push(Line::from(Span::styled(
                format!("{who} ({})", msg.timestamp.format("%H:%M")),
                style.add_modifier(Modifier::BOLD),
            )));
            for l in msg.content.lines() {
                lines.push(Line::from(l.to_string()));
            }
            lines.push(Line::from(""));
        }
        if self.chat.messages().len() == 1 {
            lines.push(Line::from(Span::styled("Try asking:", Style::default().fg(Color::Gray))));
            for s in SUGGESTIONS {
                lines.push(Line::from(Span::styled(format!("  {s}"), Style::default().fg(Color::Gray))));
            }
        }

        // Keep the newest messages in view.
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible).min(u16::MAX as usize) as u16;
        let transcript = Paragraph::new(Text::from(lines))
            .scroll((scroll, 0))
            .block(Block::default().title("Conversation").borders(Borders::ALL));
        frame.render_widget(transcript, chunks[0]);

        let input = Paragraph::new(format!("{}_", self.input))
            .block(Block::default().title("Ask").borders(Borders::ALL));
        frame.render_widget(input, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.tab {
            Tab::Overview => "Tab/←/→ switch  1-6 metrics  r reload  q quit",
            Tab::Companies | Tab::Trends => "Tab/←/→ switch  r reload  q quit",
            Tab::Reports => "↑/↓ select  j/k scroll  s save  Tab switch  q quit",
            Tab::Chat => "Enter send  ↑ suggestion  Tab switch  Esc leave",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_companies(frame: &mut ratatui::Frame<'_>, area: Rect, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(area);

    let companies = &dashboard.companies.records;
    let header = Row::new(["Name", "Category", "Funding", "Founded", "Employees", "Revenue", "Valuation"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let rows = companies.iter().map(|c| {
        Row::new(vec![
            c.name.clone(),
            c.category.clone(),
            fmt_money(c.funding_total),
            c.founded_year.to_string(),
            c.employees.to_string(),
            c.annual_revenue.map(fmt_money).unwrap_or_else(|| "-".to_string()),
            c.valuation.map(fmt_money).unwrap_or_else(|| "-".to_string()),
        ])
    });
    let widths = [
        Constraint::Length(20),
        Constraint::Length(22),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!("Companies ({})", dashboard.companies.origin.label()))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, chunks[0]);

    let funding = crate::report::funding_by_company(companies);
    let data: Vec<(&str, u64)> = funding
        .iter()
        .map(|(name, total)| (name.as_str(), to_bar(*total)))
        .collect();
    let bars = BarChart::default()
        .block(Block::default().title("Funding (USD M)").borders(Borders::ALL))
        .data(data.as_slice())
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(bars, chunks[1]);
}

fn draw_trends(frame: &mut ratatui::Frame<'_>, area: Rect, dashboard: &Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let trends = &dashboard.trends.records;
    let growth = crate::report::trend_growth(trends);
    let data: Vec<(&str, u64)> = growth
        .iter()
        .map(|(name, rate)| (name.as_str(), to_bar(*rate)))
        .collect();
    let bars = BarChart::default()
        .block(
            Block::default()
                .title(format!("Growth % YoY ({})", dashboard.trends.origin.label()))
                .borders(Borders::ALL),
        )
        .direction(Direction::Horizontal)
        .data(data.as_slice())
        .bar_width(1)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    frame.render_widget(bars, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    for t in trends {
        lines.push(Line::from(vec![
            Span::styled(t.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {} · {:.1}%", t.category, t.growth_rate), Style::default().fg(Color::Gray)),
        ]));
        lines.push(Line::from(t.description.clone()));
        lines.push(Line::from(""));
    }
    let p = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Trends").borders(Borders::ALL));
    frame.render_widget(p, chunks[1]);
}

fn to_bar(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 { v.round() as u64 } else { 0 }
}

fn load_summary(dashboard: &Dashboard) -> String {
    let fallbacks = [
        dashboard.companies.origin.is_fallback(),
        dashboard.trends.origin.is_fallback(),
        dashboard.quarterly.origin.is_fallback(),
    ]
    .into_iter()
    .filter(|f| *f)
    .count();
    if fallbacks == 0 {
        "Datasets loaded.".to_string()
    } else {
        format!("Datasets loaded ({fallbacks} of 3 from fallback data).")
    }
}

/// Chart series for Plotters: one line per metric, x = quarter index.
fn chart_series(
    records: &[QuarterlyRecord],
    metrics: &[Metric],
) -> (Vec<(Metric, Vec<(f64, f64)>)>, [f64; 2], [f64; 2]) {
    let series: Vec<(Metric, Vec<(f64, f64)>)> = crate::report::select_metric_series(records, metrics)
        .into_iter()
        .map(|s| {
            let points = s.values.into_iter().enumerate().map(|(i, v)| (i as f64, v)).collect();
            (s.metric, points)
        })
        .collect();

    let x_bounds = [0.0, (records.len().saturating_sub(1)).max(1) as f64];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in series.iter().flat_map(|(_, pts)| pts.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (series, x_bounds, y_bounds)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::LoaderConfig;
    use crate::data::{RawResponse, Transport};
    use crate::error::FetchError;

    struct NoNetwork;

    impl Transport for NoNetwork {
        fn get(&self, _url: &str) -> Result<RawResponse, FetchError> {
            Err(FetchError::Transport("no network in tests".to_string()))
        }
    }

    fn app() -> App {
        let config = LoaderConfig {
            offline: true,
            quarterly_seed: Some(1),
            ..LoaderConfig::default()
        };
        App::new(Arc::new(DatasetLoader::with_transport(config, Arc::new(NoNetwork))))
    }

    fn loaded_app() -> App {
        let mut app = app();
        let deadline = Instant::now() + Duration::from_secs(10);
        while !app.poll_loading() {
            assert!(Instant::now() < deadline, "background load did not finish");
            thread::sleep(Duration::from_millis(10));
        }
        app
    }

    #[test]
    fn tabs_wrap_around() {
        assert_eq!(Tab::Overview.next(), Tab::Companies);
        assert_eq!(Tab::Chat.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Chat);
    }

    #[test]
    fn background_load_fills_the_dashboard() {
        let app = loaded_app();
        let dashboard = app.dashboard.as_ref().unwrap();
        assert_eq!(dashboard.companies.records.len(), 5);
        assert!(dashboard.quarterly.origin.is_fallback());
        assert_eq!(app.status, "Datasets loaded (3 of 3 from fallback data).");
    }

    #[test]
    fn cancelled_load_keeps_previous_data() {
        let mut app = loaded_app();
        app.finish_loading(None);
        assert_eq!(app.status, "Load cancelled.");
        assert!(app.dashboard.is_some());
    }

    #[test]
    fn reload_cancels_the_load_in_flight() {
        let mut app = app();
        let first = app.loading.as_ref().unwrap().cancel.clone();
        assert!(!app.handle_key(KeyCode::Char('r')));
        assert!(first.is_cancelled());
        assert!(app.loading.is_some());
    }

    #[test]
    fn q_quits_except_while_chatting() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));

        app.tab = Tab::Chat;
        assert!(!app.handle_key(KeyCode::Char('q')));
        assert_eq!(app.input, "q");
        assert!(!app.handle_key(KeyCode::Esc));
        assert_eq!(app.tab, Tab::Overview);
    }

    #[test]
    fn chat_enter_sends_and_clears_input() {
        let mut app = app();
        app.tab = Tab::Chat;
        for c in "burn rates?".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(app.input.is_empty());
        let messages = app.chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "burn rates?");
        assert_eq!(messages[2].content, crate::chat::respond("burn rates"));

        app.handle_key(KeyCode::Up);
        assert_eq!(app.input, SUGGESTIONS[0]);
    }

    #[test]
    fn metric_toggles_keep_one_and_stay_ordered() {
        let mut app = app();
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.metrics, vec![Metric::Funding, Metric::Exits, Metric::Seed]);
        app.handle_key(KeyCode::Char('1'));
        app.handle_key(KeyCode::Char('2'));
        assert_eq!(app.metrics, vec![Metric::Seed]);
        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.metrics, vec![Metric::Seed]);
    }

    #[test]
    fn report_selection_is_bounded() {
        let mut app = app();
        app.tab = Tab::Reports;
        app.handle_key(KeyCode::Up);
        assert_eq!(app.report, 0);
        for _ in 0..10 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.report, REPORTS.len() - 1);
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.report_scroll, 5);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.report_scroll, 5);
    }

    #[test]
    fn chart_bounds_cover_every_series() {
        let records = crate::data::fallback::synthesize_quarterly(
            chrono::NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
            2,
        );
        let (series, x_bounds, y_bounds) = chart_series(&records, &[Metric::Funding, Metric::Exits]);
        assert_eq!(series.len(), 2);
        assert_eq!(x_bounds, [0.0, (records.len() - 1) as f64]);
        for (_, points) in &series {
            assert!(points.iter().all(|&(_, y)| y > y_bounds[0] && y < y_bounds[1]));
        }
        let (_, x_bounds, y_bounds) = chart_series(&[], &[Metric::Funding]);
        assert_eq!(x_bounds, [0.0, 1.0]);
        assert!(y_bounds[0] < 0.0 && y_bounds[1] > 1.0);
    }

    #[test]
    fn table_tabs_render_without_panicking() {
        let mut app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for tab in [Tab::Companies, Tab::Trends, Tab::Reports, Tab::Chat] {
            app.tab = tab;
            terminal.draw(|f| app.draw(f)).unwrap();
        }
    }
}
