use crate::error::FetchError;
use crate::types::{Character, Page};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,
    Tick,

    // List lifecycle
    Start,
    Refresh,
    LoadMore,
    Retry,

    // List fetch results, tagged with the generation that issued the request
    CharactersLoaded(Page, u64),
    CharactersAppended(Page, u64),
    FetchFailed(FetchError, u64),

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    CommitQuery(String),

    // Detail screen, results tagged with the requested id
    ShowCharacter(u64),
    RefreshDetail,
    DetailLoaded(Box<Character>, u64),
    DetailFailed(FetchError, u64),
    OpenImage,
    YankImageUrl,

    None,
}
