use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Time to re-read the playhead.
    Tick,
    Resize,
}

/// What a key means on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    SeekBy(i8),
    SeekTo(u8),
    VolumeUp,
    VolumeDown,
    AddSong,
    Dismiss,
}

pub struct EventHandler {
    event_sender: mpsc::UnboundedSender<AppEvent>,
    event_receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();

        Self {
            event_sender,
            event_receiver,
        }
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.event_sender.clone()
    }

    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_receiver.recv().await
    }

    /// Read the terminal on a blocking thread and forward keys and ticks.
    /// Ends once the receiving side is gone.
    pub fn spawn_reader(&self, tick_rate: Duration) {
        let sender = self.sender();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = read_terminal(&sender, tick_rate) {
                debug!("Terminal reader stopped: {}", e);
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn read_terminal(sender: &mpsc::UnboundedSender<AppEvent>, tick_rate: Duration) -> std::io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let forwarded = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                Event::Resize(_, _) => Some(AppEvent::Resize),
                _ => None,
            };
            if let Some(app_event) = forwarded {
                if sender.send(app_event).is_err() {
                    return Ok(());
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if sender.send(AppEvent::Tick).is_err() {
                return Ok(());
            }
            last_tick = Instant::now();
        }
    }
}

pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Command::Quit),

        // Transport
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Command::TogglePlayPause),
        KeyCode::Char('n') | KeyCode::Right => Some(Command::NextTrack),
        KeyCode::Char('b') | KeyCode::Left => Some(Command::PreviousTrack),

        // Seek bar
        KeyCode::Char(',') => Some(Command::SeekBy(-1)),
        KeyCode::Char('.') => Some(Command::SeekBy(1)),
        KeyCode::Char(c @ '0'..='9') => c.to_digit(10).map(|d| Command::SeekTo(d as u8 * 10)),

        // Volume slider
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => Some(Command::VolumeUp),
        KeyCode::Char('-') | KeyCode::Down => Some(Command::VolumeDown),

        KeyCode::Char('a') => Some(Command::AddSong),
        KeyCode::Enter | KeyCode::Esc => Some(Command::Dismiss),

        _ => None,
    }
}
