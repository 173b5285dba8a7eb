use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::Config;
use crate::cursor::PageCursor;
use crate::debounce::Debouncer;
use crate::event::Event;
use crate::source::CharacterSource;
use crate::types::{Character, ListStatus, LoadKind, Locator, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,   // Scrolling character list with search
    Detail, // Single character view
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,

    // List state
    pub characters: Vec<Character>,
    pub status: ListStatus,
    pub selected: usize,
    pub total: Option<u64>,
    pub active_query: String,
    cursor: PageCursor,
    generation: u64,

    // Search input
    pub search_buffer: String,
    pub debouncer: Debouncer,

    // Detail screen
    pub detail: Option<Character>,
    pending_detail: Option<u64>,

    pub flash: Option<String>,
    pub ticks: usize,
    pub should_quit: bool,

    load_ahead: usize,
    source: Arc<dyn CharacterSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn CharacterSource>,
        config: &Config,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            screen: Screen::List,
            input_mode: InputMode::default(),

            characters: Vec::new(),
            status: ListStatus::Idle,
            selected: 0,
            total: None,
            active_query: String::new(),
            cursor: PageCursor::default(),
            generation: 0,

            search_buffer: String::new(),
            debouncer: Debouncer::new(Duration::from_millis(config.search.debounce_ms)),

            detail: None,
            pending_detail: None,

            flash: None,
            ticks: 0,
            should_quit: false,

            load_ahead: config.list.load_ahead,
            source,
            action_tx,
        }
    }

    /// More pages exist for the current query.
    pub fn has_more(&self) -> bool {
        self.cursor.can_load_more()
    }

    /// A detail fetch is outstanding.
    pub fn detail_loading(&self) -> bool {
        self.pending_detail.is_some()
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Start,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.input_mode == InputMode::Search {
            return Self::handle_search_key(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.screen == Screen::List {
                    Action::Quit
                } else {
                    Action::Back
                }
            }
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
            KeyCode::Char('g') => Action::GoToTop,
            KeyCode::Char('G') => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('/') => {
                if self.screen == Screen::List {
                    Action::EnterSearchMode
                } else {
                    Action::None
                }
            }
            KeyCode::Char('r') => match self.screen {
                Screen::List => {
                    if matches!(self.status, ListStatus::Error { .. }) {
                        Action::Retry
                    } else {
                        Action::Refresh
                    }
                }
                Screen::Detail => Action::RefreshDetail,
            },
            KeyCode::Char('o') => {
                if self.screen == Screen::Detail {
                    Action::OpenImage
                } else {
                    Action::None
                }
            }
            KeyCode::Char('y') => {
                if self.screen == Screen::Detail {
                    Action::YankImageUrl
                } else {
                    Action::None
                }
            }
            _ => Action::None,
        }
    }

    fn handle_search_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ExitSearchMode,
            KeyCode::Enter => Action::SearchConfirm,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(c) => Action::SearchInput(c),
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        // A flash survives background traffic but not the next thing the
        // user does.
        if self.flash.is_some()
            && !matches!(
                action,
                Action::Tick
                    | Action::CharactersLoaded(..)
                    | Action::CharactersAppended(..)
                    | Action::FetchFailed(..)
                    | Action::DetailLoaded(..)
                    | Action::DetailFailed(..)
            )
        {
            self.flash = None;
        }

        match action {
            Action::Quit => {
                self.debouncer.cancel_pending();
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::List => {
                    self.debouncer.cancel_pending();
                    self.should_quit = true;
                }
                Screen::Detail => {
                    self.screen = Screen::List;
                    self.detail = None;
                    self.pending_detail = None;
                }
            },
            Action::Tick => {
                self.ticks = self.ticks.wrapping_add(1);
            }

            Action::ScrollUp => self.move_selection_up(1),
            Action::ScrollDown => self.move_selection_down(1),
            Action::PageUp => self.move_selection_up(10),
            Action::PageDown => self.move_selection_down(10),
            Action::GoToTop => {
                if self.screen == Screen::List {
                    self.selected = 0;
                }
            }
            Action::GoToBottom => {
                if self.screen == Screen::List && !self.characters.is_empty() {
                    self.selected = self.characters.len() - 1;
                    self.maybe_load_more();
                }
            }
            Action::Select => {
                if self.screen == Screen::List {
                    if let Some(character) = self.characters.get(self.selected) {
                        // The row already holds the whole record; no refetch.
                        self.detail = Some(character.clone());
                        self.pending_detail = None;
                        self.screen = Screen::Detail;
                    }
                }
            }

            Action::Start => self.reset_list(String::new()),
            Action::Refresh => {
                let query = self.active_query.clone();
                self.reset_list(query);
            }
            Action::LoadMore => self.load_more(),
            Action::Retry => self.retry(),

            Action::CharactersLoaded(page, generation) => {
                if generation == self.generation {
                    self.apply_loaded(page);
                } else {
                    debug!(generation, current = self.generation, "stale page dropped");
                }
            }
            Action::CharactersAppended(page, generation) => {
                if generation == self.generation {
                    self.apply_appended(page);
                } else {
                    debug!(generation, current = self.generation, "stale page dropped");
                }
            }
            Action::FetchFailed(error, generation) => {
                if generation == self.generation {
                    let phase = match self.status {
                        ListStatus::LoadingMore => LoadKind::Append,
                        _ => LoadKind::Reset,
                    };
                    warn!(%error, ?phase, "page fetch failed");
                    self.status = ListStatus::Error { error, phase };
                } else {
                    debug!(generation, current = self.generation, "stale failure dropped");
                }
            }

            Action::EnterSearchMode => {
                if self.screen == Screen::List {
                    self.input_mode = InputMode::Search;
                    self.search_buffer = self.active_query.clone();
                }
            }
            Action::ExitSearchMode => {
                self.input_mode = InputMode::Normal;
                self.debouncer.cancel_pending();
                self.search_buffer = self.active_query.clone();
            }
            Action::SearchInput(c) => {
                self.search_buffer.push(c);
                self.debouncer
                    .schedule(self.search_buffer.clone(), Instant::now());
            }
            Action::SearchBackspace => {
                if self.search_buffer.pop().is_some() {
                    self.debouncer
                        .schedule(self.search_buffer.clone(), Instant::now());
                }
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                if let Some(query) = self.debouncer.take_pending() {
                    self.reset_list(query);
                }
            }
            Action::CommitQuery(query) => self.reset_list(query),

            Action::ShowCharacter(id) => {
                self.pending_detail = Some(id);
                self.spawn_fetch_detail(id);
            }
            Action::RefreshDetail => {
                if let Some(character) = &self.detail {
                    let id = character.id;
                    self.pending_detail = Some(id);
                    self.spawn_fetch_detail(id);
                }
            }
            Action::DetailLoaded(character, id) => {
                if self.pending_detail == Some(id) {
                    self.pending_detail = None;
                    self.detail = Some(*character);
                    self.screen = Screen::Detail;
                } else {
                    debug!(id, "stale detail dropped");
                }
            }
            Action::DetailFailed(error, id) => {
                if self.pending_detail == Some(id) {
                    self.pending_detail = None;
                    warn!(%error, id, "detail fetch failed");
                    self.flash = Some(format!("Couldn't load character {}: {}", id, error));
                } else {
                    debug!(id, "stale detail failure dropped");
                }
            }
            Action::OpenImage => {
                if let Some(character) = &self.detail {
                    self.flash = Some(match open::that(&character.image) {
                        Ok(()) => "Opened image in browser".to_string(),
                        Err(e) => format!("Couldn't open image: {}", e),
                    });
                }
            }
            Action::YankImageUrl => {
                if let Some(character) = &self.detail {
                    let result = arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(character.image.clone()));
                    self.flash = Some(match result {
                        Ok(()) => "Image URL copied".to_string(),
                        Err(e) => format!("Clipboard error: {}", e),
                    });
                }
            }

            Action::None => {}
        }
    }

    /// Throw away the current list and fetch the first page of `query`.
    /// Bumping the generation makes every response still in flight stale.
    fn reset_list(&mut self, query: String) {
        self.generation += 1;
        let locator = self.source.first_page(&query);
        self.active_query = query;
        self.cursor.reset(locator.clone());
        self.characters.clear();
        self.selected = 0;
        self.total = None;
        self.status = ListStatus::LoadingInitial;
        self.spawn_fetch_page(locator, LoadKind::Reset, self.generation);
    }

    fn load_more(&mut self) {
        if self.status != ListStatus::Idle || !self.cursor.can_load_more() {
            return;
        }
        let Some(locator) = self.cursor.current().cloned() else {
            return;
        };
        self.status = ListStatus::LoadingMore;
        self.spawn_fetch_page(locator, LoadKind::Append, self.generation);
    }

    /// Re-issue the request that just failed. The cursor never advanced, so
    /// the locator and generation are still the right ones.
    fn retry(&mut self) {
        let ListStatus::Error { phase, .. } = &self.status else {
            return;
        };
        let phase = *phase;
        let Some(locator) = self.cursor.current().cloned() else {
            let query = self.active_query.clone();
            self.reset_list(query);
            return;
        };
        self.status = match phase {
            LoadKind::Reset => ListStatus::LoadingInitial,
            LoadKind::Append => ListStatus::LoadingMore,
        };
        self.spawn_fetch_page(locator, phase, self.generation);
    }

    fn apply_loaded(&mut self, page: Page) {
        self.cursor.advance(page.next);
        self.total = page.total;
        self.characters.clear();
        merge_unique(&mut self.characters, page.characters);
        self.selected = 0;
        self.status = ListStatus::Idle;
    }

    fn apply_appended(&mut self, page: Page) {
        self.cursor.advance(page.next);
        if page.total.is_some() {
            self.total = page.total;
        }
        merge_unique(&mut self.characters, page.characters);
        self.status = ListStatus::Idle;
    }

    fn move_selection_up(&mut self, by: usize) {
        if self.screen == Screen::List {
            self.selected = self.selected.saturating_sub(by);
        }
    }

    fn move_selection_down(&mut self, by: usize) {
        if self.screen != Screen::List || self.characters.is_empty() {
            return;
        }
        self.selected = (self.selected + by).min(self.characters.len() - 1);
        self.maybe_load_more();
    }

    fn maybe_load_more(&mut self) {
        if self.selected + self.load_ahead >= self.characters.len() {
            self.load_more();
        }
    }

    fn spawn_fetch_page(&self, locator: Locator, kind: LoadKind, generation: u64) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            match source.fetch_page(&locator).await {
                Ok(page) => {
                    let action = match kind {
                        LoadKind::Reset => Action::CharactersLoaded(page, generation),
                        LoadKind::Append => Action::CharactersAppended(page, generation),
                    };
                    tx.send(action).ok();
                }
                Err(e) => {
                    tx.send(Action::FetchFailed(e, generation)).ok();
                }
            }
        });
    }

    fn spawn_fetch_detail(&self, id: u64) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            match source.fetch_character(id).await {
                Ok(character) => {
                    tx.send(Action::DetailLoaded(Box::new(character), id)).ok();
                }
                Err(e) => {
                    tx.send(Action::DetailFailed(e, id)).ok();
                }
            }
        });
    }
}

/// Append `incoming` to `list`, skipping ids already present. Adjacent pages
/// from the directory can overlap after inserts upstream.
fn merge_unique(list: &mut Vec<Character>, incoming: Vec<Character>) {
    let mut seen: HashSet<u64> = list.iter().map(|c| c.id).collect();
    for character in incoming {
        if seen.insert(character.id) {
            list.push(character);
        }
    }
}
