//! Sport events referenced by feed messages
//!
//! The concrete event type is determined by the type segment of the event
//! urn. Wrappers are built through a [`SportEventFactory`] so that callers can
//! plug in richer, profile-backed implementations.

use super::{Language, Urn};
use serde::{Deserialize, Serialize};

/// Concrete event type derived from the urn type segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SportEventKind {
    Match,
    Stage,
    Tournament,
    Season,
    Draw,
    Lottery,
    BasicTournament,
    /// Any other type; also usable as a request for "whatever the id is"
    Other,
}

impl SportEventKind {
    pub fn from_urn(urn: &Urn) -> Self {
        match urn.kind() {
            "match" => SportEventKind::Match,
            "stage" | "race_event" => SportEventKind::Stage,
            "tournament" | "race_tournament" => SportEventKind::Tournament,
            "season" => SportEventKind::Season,
            "draw" => SportEventKind::Draw,
            "lottery" => SportEventKind::Lottery,
            "simple_tournament" => SportEventKind::BasicTournament,
            _ => SportEventKind::Other,
        }
    }

    /// Whether an event of kind `actual` can be represented as `self`
    pub fn accepts(self, actual: SportEventKind) -> bool {
        self == SportEventKind::Other || self == actual
    }
}

/// Identity shared by every event wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportEventHandle {
    pub id: Urn,
    pub sport_id: Option<Urn>,
    /// Languages the event was requested in
    pub languages: Vec<Language>,
}

/// Event wrapper tagged by its concrete type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SportEvent {
    Match(SportEventHandle),
    Stage(SportEventHandle),
    Tournament(SportEventHandle),
    Season(SportEventHandle),
    Draw(SportEventHandle),
    Lottery(SportEventHandle),
    BasicTournament(SportEventHandle),
    Other(SportEventHandle),
}

impl SportEvent {
    pub fn from_handle(kind: SportEventKind, handle: SportEventHandle) -> Self {
        match kind {
            SportEventKind::Match => SportEvent::Match(handle),
            SportEventKind::Stage => SportEvent::Stage(handle),
            SportEventKind::Tournament => SportEvent::Tournament(handle),
            SportEventKind::Season => SportEvent::Season(handle),
            SportEventKind::Draw => SportEvent::Draw(handle),
            SportEventKind::Lottery => SportEvent::Lottery(handle),
            SportEventKind::BasicTournament => SportEvent::BasicTournament(handle),
            SportEventKind::Other => SportEvent::Other(handle),
        }
    }

    pub fn kind(&self) -> SportEventKind {
        match self {
            SportEvent::Match(_) => SportEventKind::Match,
            SportEvent::Stage(_) => SportEventKind::Stage,
            SportEvent::Tournament(_) => SportEventKind::Tournament,
            SportEvent::Season(_) => SportEventKind::Season,
            SportEvent::Draw(_) => SportEventKind::Draw,
            SportEvent::Lottery(_) => SportEventKind::Lottery,
            SportEvent::BasicTournament(_) => SportEventKind::BasicTournament,
            SportEvent::Other(_) => SportEventKind::Other,
        }
    }

    pub fn handle(&self) -> &SportEventHandle {
        match self {
            SportEvent::Match(h)
            | SportEvent::Stage(h)
            | SportEvent::Tournament(h)
            | SportEvent::Season(h)
            | SportEvent::Draw(h)
            | SportEvent::Lottery(h)
            | SportEvent::BasicTournament(h)
            | SportEvent::Other(h) => h,
        }
    }

    pub fn id(&self) -> &Urn {
        &self.handle().id
    }
}

/// Builds concrete event wrappers from ids
pub trait SportEventFactory: Send + Sync {
    fn build(
        &self,
        kind: SportEventKind,
        id: &Urn,
        sport_id: Option<&Urn>,
        languages: &[Language],
    ) -> SportEvent;
}

/// Factory producing plain id-only wrappers
#[derive(Debug, Clone, Default)]
pub struct DefaultSportEventFactory;

impl SportEventFactory for DefaultSportEventFactory {
    fn build(
        &self,
        kind: SportEventKind,
        id: &Urn,
        sport_id: Option<&Urn>,
        languages: &[Language],
    ) -> SportEvent {
        SportEvent::from_handle(
            kind,
            SportEventHandle {
                id: id.clone(),
                sport_id: sport_id.cloned(),
                languages: languages.to_vec(),
            },
        )
    }
}
