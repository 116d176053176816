use crate::grid::{group_by_month, month_key, pad_to_weeks, GridCell, MonthGroup};
use crate::lunar::{ChineseLunar, LunarCalendar};
use crate::model::DateRange;
use crate::scroll::{resolve_today_target, ScrollAnchor};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use std::collections::HashMap;
use std::io::{stdout, Stdout};
use std::time::Duration;

const CELL: usize = 6;

pub fn run(range: DateRange, lunar: bool) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(range, lunar);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    range: DateRange,
    lunar_enabled: bool,
    today: NaiveDate,
    document: Document,
    offset: usize,
    viewport: usize,
    status: String,
}

/// The committed renderable structure: every month flattened into lines,
/// plus the indices scroll anchors resolve against. Scroll targets are only
/// ever computed from a freshly built document, never from a timer.
struct Document {
    lines: Vec<Line<'static>>,
    month_starts: HashMap<String, usize>,
    today_line: Option<usize>,
}

impl App {
    fn new(range: DateRange, lunar: bool) -> Self {
        let today = Local::now().date_naive();
        let document = build_document(&range, lunar, today);
        let status = match (range.first(), range.last()) {
            (Some(first), Some(last)) => format!(
                "Loaded {} .. {} ({} months)",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d"),
                document.month_starts.len()
            ),
            _ => "Loaded an empty range".into(),
        };
        let mut app = App {
            range,
            lunar_enabled: lunar,
            today,
            document,
            offset: 0,
            viewport: 1,
            status,
        };
        app.jump_to_today();
        app
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.offset = self.offset.saturating_add(1),
            KeyCode::PageUp => self.offset = self.offset.saturating_sub(self.viewport),
            KeyCode::PageDown => self.offset = self.offset.saturating_add(self.viewport),
            KeyCode::Home | KeyCode::Char('g') => self.offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.offset = self.document.lines.len(),
            KeyCode::Char('t') => self.jump_to_today(),
            KeyCode::Char('e') => self.extend_range(),
            KeyCode::Char('l') => self.toggle_lunar(),
            _ => {}
        }
        false
    }

    /// Two-stage jump: first the month anchor, then the exact today line.
    fn jump_to_today(&mut self) {
        match resolve_today_target(self.range.days(), self.today) {
            Some(anchor) => {
                self.scroll_to(&anchor);
                self.scroll_to(&ScrollAnchor::Today);
                self.status = format!("Jumped to {}", self.today.format("%Y-%m-%d"));
            }
            None => {
                self.status = "Today is outside the loaded range".into();
            }
        }
    }

    fn scroll_to(&mut self, anchor: &ScrollAnchor) {
        match anchor {
            ScrollAnchor::Month(key) => {
                if let Some(&line) = self.document.month_starts.get(key) {
                    self.offset = line;
                }
            }
            ScrollAnchor::Today => {
                if let Some(line) = self.document.today_line {
                    // Keep the month title and weekday header in view.
                    self.offset = line.saturating_sub(2);
                }
            }
        }
    }

    fn extend_range(&mut self) {
        match self.range.extend_by_one_year() {
            Ok(year) => {
                self.rebuild_document();
                self.status = format!("Extended range through {}", year);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn toggle_lunar(&mut self) {
        self.lunar_enabled = !self.lunar_enabled;
        let anchor = self.anchor_at_offset();
        self.rebuild_document();
        // Toggling changes line density; re-resolve so the view stays put.
        if let Some(anchor) = anchor {
            self.scroll_to(&anchor);
        }
        self.status = if self.lunar_enabled {
            "Lunar annotations on".into()
        } else {
            "Lunar annotations off".into()
        };
    }

    fn rebuild_document(&mut self) {
        self.document = build_document(&self.range, self.lunar_enabled, self.today);
        self.offset = self.offset.min(self.document.lines.len());
    }

    fn anchor_at_offset(&self) -> Option<ScrollAnchor> {
        let mut best: Option<(&String, usize)> = None;
        for (key, &line) in &self.document.month_starts {
            if line <= self.offset && best.map_or(true, |(_, b)| line >= b) {
                best = Some((key, line));
            }
        }
        best.map(|(key, _)| ScrollAnchor::Month(key.clone()))
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(f.size());
        self.draw_header(f, layout[0]);
        self.draw_months(f, layout[1]);
        self.draw_footer(f, layout[2]);
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let span_text = match (self.range.first(), self.range.last()) {
            (Some(first), Some(last)) => {
                format!("{} .. {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
            }
            _ => "empty range".into(),
        };
        let title = Line::from(vec![
            Span::styled(
                "lunacal ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(span_text, Style::default().fg(Color::Gray)),
            Span::raw("  •  "),
            Span::styled(
                format!("today {}", self.today.format("%Y-%m-%d")),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  •  "),
            Span::styled(
                if self.lunar_enabled {
                    "lunar on"
                } else {
                    "lunar off"
                },
                Style::default().fg(Color::Magenta),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_months(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        self.viewport = (area.height as usize).max(1);
        let max_offset = self.document.lines.len().saturating_sub(self.viewport);
        self.offset = self.offset.min(max_offset);
        let end = (self.offset + self.viewport).min(self.document.lines.len());
        let visible = self.document.lines[self.offset..end].to_vec();
        let paragraph = Paragraph::new(visible).alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                self.status.clone(),
                Style::default().fg(Color::LightYellow),
            )),
            Line::from(Span::styled(
                "↑/↓ scroll  •  PgUp/PgDn page  •  t today  •  e extend year  •  l lunar  •  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }
}

fn build_document(range: &DateRange, lunar: bool, today: NaiveDate) -> Document {
    let converter = ChineseLunar;
    let lunar: Option<&dyn LunarCalendar> = if lunar { Some(&converter) } else { None };
    let mut lines = Vec::new();
    let mut month_starts = HashMap::new();
    let mut today_line = None;
    for group in group_by_month(range.days()) {
        month_starts.insert(month_key(group.first_day()), lines.len());
        lines.push(month_title(&group));
        lines.push(weekday_header());
        let cells = pad_to_weeks(&group, lunar);
        for week in cells.chunks(7) {
            let has_today = week
                .iter()
                .any(|c| matches!(c, GridCell::Day(d) if d.date == today));
            if has_today {
                today_line = Some(lines.len());
            }
            lines.push(solar_row(week, today));
            if lunar.is_some() {
                lines.push(lunar_row(week, today));
            }
        }
        lines.push(Line::raw(""));
    }
    Document {
        lines,
        month_starts,
        today_line,
    }
}

fn month_title(group: &MonthGroup) -> Line<'static> {
    Line::from(Span::styled(
        group.first_day().format("%B %Y").to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn weekday_header() -> Line<'static> {
    let spans = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
        .iter()
        .map(|h| {
            Span::styled(
                format!("{:<width$}", h, width = CELL),
                Style::default().fg(Color::Gray),
            )
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn solar_row(week: &[GridCell], today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::with_capacity(week.len());
    for cell in week {
        match cell {
            GridCell::Day(day) => {
                let mut style = Style::default().fg(Color::White);
                if day.date == today {
                    style = style
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(
                    format!("{:<width$}", day.date.day(), width = CELL),
                    style,
                ));
            }
            GridCell::Empty => spans.push(Span::raw(" ".repeat(CELL))),
        }
    }
    Line::from(spans)
}

fn lunar_row(week: &[GridCell], today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::with_capacity(week.len());
    for cell in week {
        match cell {
            GridCell::Day(day) => match &day.lunar {
                Some(label) => {
                    let mut style = Style::default().fg(Color::DarkGray);
                    if day.date == today {
                        style = Style::default().fg(Color::Cyan);
                    }
                    // Two CJK chars take four columns; pad to the cell width.
                    spans.push(Span::styled(format!("{}  ", label), style));
                }
                None => spans.push(Span::raw(" ".repeat(CELL))),
            },
            GridCell::Empty => spans.push(Span::raw(" ".repeat(CELL))),
        }
    }
    Line::from(spans)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(out))?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
