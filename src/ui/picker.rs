// Add-song dialog: pick an audio file from the music directory,
// or type a path to one.

use crate::audio::{MusicScanner, Track};
use crossterm::event::{KeyCode, KeyEvent};
use fuzzy_matcher::{clangd::ClangdMatcher, FuzzyMatcher};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    /// Closed without a choice. Not an error.
    Cancelled,
    Picked(PathBuf),
}

pub struct FilePicker {
    candidates: Vec<Track>,
    query: String,
    matches: Vec<usize>,
    selected: usize,
    matcher: ClangdMatcher,
}

impl FilePicker {
    pub fn new(candidates: Vec<Track>) -> Self {
        let mut picker = Self {
            candidates,
            query: String::new(),
            matches: Vec::new(),
            selected: 0,
            matcher: ClangdMatcher::default(),
        };
        picker.refilter();
        picker
    }

    pub fn scan(scanner: &MusicScanner, directory: &std::path::Path) -> Self {
        Self::new(scanner.scan_directory(directory))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Candidates that match the query, best first.
    pub fn visible(&self) -> impl Iterator<Item = &Track> {
        self.matches.iter().map(|&i| &self.candidates[i])
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerOutcome {
        match key.code {
            KeyCode::Esc => PickerOutcome::Cancelled,
            KeyCode::Enter => match self.resolve() {
                Some(path) => PickerOutcome::Picked(path),
                None => PickerOutcome::Cancelled,
            },
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                PickerOutcome::Pending
            }
            KeyCode::Down => {
                if self.selected + 1 < self.matches.len() {
                    self.selected += 1;
                }
                PickerOutcome::Pending
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter();
                PickerOutcome::Pending
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.refilter();
                PickerOutcome::Pending
            }
            _ => PickerOutcome::Pending,
        }
    }

    /// A typed path to an existing audio file wins over the highlighted row.
    pub fn resolve(&self) -> Option<PathBuf> {
        let typed = PathBuf::from(self.query.trim());
        if typed.is_file() && MusicScanner::is_supported_file(&typed) {
            return Some(typed);
        }
        self.matches
            .get(self.selected)
            .map(|&i| self.candidates[i].file_path.clone())
    }

    fn refilter(&mut self) {
        let query = self.query.trim();
        if query.is_empty() {
            self.matches = (0..self.candidates.len()).collect();
        } else {
            let mut scored: Vec<(i64, usize)> = self
                .candidates
                .iter()
                .enumerate()
                .filter_map(|(i, track)| {
                    let haystack = track.file_path.to_string_lossy();
                    self.matcher.fuzzy_match(&haystack, query).map(|score| (score, i))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            self.matches = scored.into_iter().map(|(_, i)| i).collect();
        }
        self.selected = 0;
    }
}
