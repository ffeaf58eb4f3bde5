use super::events::key_to_command;
use super::view::ViewState;
use super::{AppEvent, Command, EventHandler, FilePicker, PickerOutcome, TerminalManager};
use crate::audio::{MusicScanner, PlaybackBackend};
use crate::config::Config;
use crate::controller::{Controller, PlayerEvent};
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct App {
    config: Config,
    terminal: TerminalManager,
    event_handler: EventHandler,
    controller: Controller<Box<dyn PlaybackBackend>>,
    player_events: mpsc::UnboundedReceiver<PlayerEvent>,
    scanner: MusicScanner,

    // UI state
    view: ViewState,
    table_state: TableState,
    picker: Option<FilePicker>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, mut controller: Controller<Box<dyn PlaybackBackend>>) -> Result<Self> {
        let (sender, player_events) = mpsc::unbounded_channel();
        controller.set_event_sender(sender);

        let terminal = TerminalManager::new()?;

        Ok(Self {
            config,
            terminal,
            event_handler: EventHandler::new(),
            controller,
            player_events,
            scanner: MusicScanner::new(),
            view: ViewState::default(),
            table_state: TableState::default(),
            picker: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.event_handler.spawn_reader(self.config.ui.poll_interval());
        self.drain_player_events();

        while !self.should_quit {
            self.render()?;

            match self.event_handler.next_event().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
            self.drain_player_events();
        }

        info!("Shutting down");
        Ok(())
    }

    fn drain_player_events(&mut self) {
        while let Ok(event) = self.player_events.try_recv() {
            self.view.apply(event);
        }
        self.table_state.select(self.view.selected);
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.controller.tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Some(picker) = self.picker.as_mut() {
            match picker.handle_key(key) {
                PickerOutcome::Pending => {}
                PickerOutcome::Cancelled => {
                    debug!("Add song cancelled");
                    self.picker = None;
                }
                PickerOutcome::Picked(path) => {
                    self.picker = None;
                    // rejections arrive as PlayerEvent::Error
                    let _ = self.controller.add_track(&path);
                }
            }
            return;
        }

        let Some(command) = key_to_command(key) else {
            return;
        };

        // the notice is modal, like a message box
        if self.view.notice.is_some() {
            match command {
                Command::Dismiss => {
                    self.view.dismiss_notice();
                }
                Command::Quit => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match command {
            Command::Quit => self.should_quit = true,
            Command::TogglePlayPause => self.controller.toggle_pause(),
            Command::NextTrack => {
                self.controller.next();
            }
            Command::PreviousTrack => {
                self.controller.prev();
            }
            Command::SeekBy(direction) => {
                let step = i64::from(self.config.ui.seek_step_percent) * i64::from(direction);
                let target = (i64::from(self.view.progress) + step).clamp(0, 100);
                self.controller.seek_percent(target as u8);
            }
            Command::SeekTo(percent) => {
                self.controller.seek_percent(percent);
            }
            Command::VolumeUp => {
                let target = i64::from(self.view.volume.get()) + i64::from(self.config.ui.volume_step);
                self.controller.set_volume(target);
            }
            Command::VolumeDown => {
                let target = i64::from(self.view.volume.get()) - i64::from(self.config.ui.volume_step);
                self.controller.set_volume(target);
            }
            Command::AddSong => {
                self.picker = Some(FilePicker::scan(&self.scanner, &self.config.music_directory));
            }
            Command::Dismiss => {}
        }
    }

    fn render(&mut self) -> Result<()> {
        let Self {
            terminal,
            view,
            table_state,
            picker,
            ..
        } = self;

        terminal.draw(|f| {
            Self::render_ui(f, view, table_state);
            if let Some(picker) = picker.as_ref() {
                Self::render_picker(f, picker);
            }
            if let Some(notice) = view.notice.as_deref() {
                Self::render_notice(f, notice);
            }
        })
    }

    fn render_ui(f: &mut Frame, view: &ViewState, table_state: &mut TableState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Song table
                Constraint::Length(3), // Seek bar
                Constraint::Length(3), // Label
                Constraint::Length(3), // Transport + volume
            ])
            .split(f.area());

        Self::render_table(f, chunks[0], view, table_state);
        Self::render_seek_bar(f, chunks[1], view);

        let label = Paragraph::new(view.label.as_str())
            .block(Block::default().borders(Borders::ALL).title("Now Playing"));
        f.render_widget(label, chunks[2]);

        Self::render_controls(f, chunks[3], view);
    }

    fn render_table(f: &mut Frame, area: Rect, view: &ViewState, table_state: &mut TableState) {
        let header = Row::new(vec![Cell::from("Song"), Cell::from("Length"), Cell::from("Size")])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = view
            .rows
            .iter()
            .map(|info| {
                Row::new(vec![
                    Cell::from(info.name.clone()),
                    Cell::from(info.length_label()),
                    Cell::from(info.size_label()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(50),
                Constraint::Percentage(20),
                Constraint::Percentage(30),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("exl-player"))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("► ");

        f.render_stateful_widget(table, area, table_state);
    }

    fn render_seek_bar(f: &mut Frame, area: Rect, view: &ViewState) {
        let label = format!(
            "{}:{:02} / {}:{:02}",
            view.elapsed_secs / 60,
            view.elapsed_secs % 60,
            view.duration_secs / 60,
            view.duration_secs % 60
        );
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Position"))
            .gauge_style(Style::default().fg(Color::Yellow))
            .percent(view.progress.min(100))
            .label(label);
        f.render_widget(gauge, area);
    }

    fn render_controls(f: &mut Frame, area: Rect, view: &ViewState) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let hints = format!(
            "<<< [b]   {} [space]   >>> [n]   + [a]   seek [,/.]   quit [q]",
            view.play_button()
        );
        let controls = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
        f.render_widget(controls, chunks[0]);

        let volume = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Volume [+/-]"))
            .gauge_style(Style::default().fg(Color::Green))
            .percent(u16::from(view.volume.get()));
        f.render_widget(volume, chunks[1]);
    }

    fn render_picker(f: &mut Frame, picker: &FilePicker) {
        let area = centered_rect(80, 70, f.area());
        f.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let input = Paragraph::new(picker.query())
            .block(Block::default().borders(Borders::ALL).title("Open file (Audio Files) - Esc to cancel"));
        f.render_widget(input, chunks[0]);

        let items: Vec<ListItem> = picker
            .visible()
            .map(|track| ListItem::new(track.file_path.display().to_string()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("► ");

        let mut state = ListState::default();
        state.select(Some(picker.selected()));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn render_notice(f: &mut Frame, notice: &str) {
        let area = centered_rect(60, 25, f.area());
        f.render_widget(Clear, area);

        let popup = Paragraph::new(notice)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error - Enter to dismiss"));
        f.render_widget(popup, area);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
