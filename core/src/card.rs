//! Interaction state machine for one film card.
//!
//! # Design
//! A `Card` is pure state plus transitions. It never performs I/O: a load
//! request hands back a `FetchTicket` for the host to execute, and the host
//! reports the result through `settle`. The input modality (pointer or touch)
//! is decided by the host for each interaction and passed in, so the same
//! card reacts differently to a press depending on how it was produced.
//!
//! ```text
//! Resting --load--> Loading --ok--> Loaded <--enter/leave (pointer)--> Expanded
//!                      \--err--> Errored
//! Loaded  --tap--> Expanded --tap--> Resting
//! Loaded | Expanded | Errored --click--> Resting
//! ```
//!
//! Every fetch is stamped with a generation. `settle` only applies a result
//! whose ticket matches the generation of the fetch the card is waiting on.

use crate::query::QueryFailure;
use crate::types::{Film, FilmConfig};

/// Visual state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardState {
    Resting,
    Loading,
    Loaded,
    Expanded,
    Errored,
}

/// How the current interaction was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Pointer,
    Touch,
}

/// A user interaction with a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// The load button on the resting face.
    RequestLoad,
    PointerEnter,
    PointerLeave,
    /// A click under pointer input, a tap under touch input.
    Press,
}

/// Result of the last fetch this card issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Nothing fetched yet, or a fetch is still pending.
    Idle,
    Success(Film),
    Failure(QueryFailure),
}

/// Instruction to fetch one film on behalf of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub film_id: String,
    pub generation: u64,
}

/// What `Card::handle` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: CardState,
    pub to: CardState,
    /// Set only when the card moved from `Resting` to `Loading`.
    pub fetch: Option<FetchTicket>,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.fetch.is_none()
    }
}

/// What `Card::settle` did with a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Loaded,
    /// `message` goes to the notification sink, once.
    Errored { message: String },
    /// The card was not waiting for this result; nothing changed.
    Stale,
}

/// What the visual layer should draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardFace<'a> {
    Front { title: &'a str, color: &'a str },
    Skeleton,
    Details { summary: FilmSummary<'a>, expanded: bool },
    Error { message: &'a str },
}

/// Display-ready film details with placeholders for missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmSummary<'a> {
    pub title: &'a str,
    pub image: Option<&'a str>,
    pub description: &'a str,
    pub director: &'a str,
    pub release: &'a str,
    pub runtime: String,
    pub score: String,
}

const NOT_AVAILABLE: &str = "N/A";

impl<'a> FilmSummary<'a> {
    pub fn new(film: &'a Film) -> Self {
        Self {
            title: &film.title,
            image: film.image.as_deref(),
            description: film.description.as_deref().unwrap_or(NOT_AVAILABLE),
            director: film.director.as_deref().unwrap_or(NOT_AVAILABLE),
            release: film.release_date.as_deref().unwrap_or(NOT_AVAILABLE),
            runtime: film
                .running_time
                .as_deref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |t| format!("{t} min")),
            score: film
                .rt_score
                .as_deref()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |s| format!("{s}%")),
        }
    }
}

/// One card bound to one film configuration.
#[derive(Debug, Clone)]
pub struct Card {
    config: FilmConfig,
    state: CardState,
    is_expanded: bool,
    outcome: FetchOutcome,
    generation: u64,
}

impl Card {
    pub fn new(config: FilmConfig) -> Self {
        Self {
            config,
            state: CardState::Resting,
            is_expanded: false,
            outcome: FetchOutcome::Idle,
            generation: 0,
        }
    }

    pub fn config(&self) -> &FilmConfig {
        &self.config
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    /// Drives the expand animation. True only in `Expanded`.
    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    /// The back face is showing.
    pub fn is_flipped(&self) -> bool {
        self.state != CardState::Resting
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn film(&self) -> Option<&Film> {
        match &self.outcome {
            FetchOutcome::Success(film) => Some(film),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&QueryFailure> {
        match &self.outcome {
            FetchOutcome::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one interaction. Anything not in the transition table leaves the
    /// card untouched.
    pub fn handle(&mut self, interaction: Interaction, modality: Modality) -> Transition {
        use CardState::*;
        use Interaction::*;

        let from = self.state;
        let mut fetch = None;

        match (from, interaction, modality) {
            (Resting, RequestLoad, _) => {
                self.generation += 1;
                self.outcome = FetchOutcome::Idle;
                self.set_state(Loading);
                fetch = Some(FetchTicket {
                    film_id: self.config.id.clone(),
                    generation: self.generation,
                });
            }
            (Loaded, PointerEnter, Modality::Pointer) | (Loaded, Press, Modality::Touch) => {
                self.set_state(Expanded);
            }
            (Expanded, PointerLeave, Modality::Pointer) => self.set_state(Loaded),
            (Expanded, Press, Modality::Touch)
            | (Loaded | Expanded, Press, Modality::Pointer)
            | (Errored, Press, _) => self.reset(),
            _ => {}
        }

        let transition = Transition {
            from,
            to: self.state,
            fetch,
        };
        if !transition.is_noop() {
            tracing::debug!(
                film = %self.config.title,
                ?interaction,
                ?modality,
                from = ?transition.from,
                to = ?transition.to,
                "card transition"
            );
        }
        transition
    }

    /// Apply the result of a fetch issued by `handle`.
    pub fn settle(&mut self, ticket: &FetchTicket, result: Result<Film, QueryFailure>) -> Settlement {
        if self.state != CardState::Loading || ticket.generation != self.generation {
            tracing::debug!(
                film = %self.config.title,
                ticket = ticket.generation,
                current = self.generation,
                state = ?self.state,
                "discarding stale fetch result"
            );
            return Settlement::Stale;
        }

        match result {
            Ok(film) => {
                self.outcome = FetchOutcome::Success(film);
                self.set_state(CardState::Loaded);
                Settlement::Loaded
            }
            Err(failure) => {
                let message = failure.message.clone();
                self.outcome = FetchOutcome::Failure(failure);
                self.set_state(CardState::Errored);
                Settlement::Errored { message }
            }
        }
    }

    pub fn face(&self) -> CardFace<'_> {
        match (&self.state, &self.outcome) {
            (CardState::Resting, _) => CardFace::Front {
                title: &self.config.title,
                color: &self.config.color,
            },
            (_, FetchOutcome::Failure(failure)) => CardFace::Error {
                message: &failure.message,
            },
            (_, FetchOutcome::Success(film)) => CardFace::Details {
                summary: FilmSummary::new(film),
                expanded: self.is_expanded,
            },
            (_, FetchOutcome::Idle) => CardFace::Skeleton,
        }
    }

    /// Back to the front face, dropping whatever was fetched so the next load
    /// goes to the network again.
    fn reset(&mut self) {
        self.outcome = FetchOutcome::Idle;
        self.generation += 1;
        self.set_state(CardState::Resting);
    }

    fn set_state(&mut self, state: CardState) {
        self.state = state;
        self.is_expanded = state == CardState::Expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config() -> FilmConfig {
        FilmConfig::new("2baf70d1-42bb-4437-b551-e5fed5a87abe", "Castle in the Sky", "#abcdef")
    }

    fn film() -> Film {
        Film {
            id: "2baf70d1-42bb-4437-b551-e5fed5a87abe".to_string(),
            title: "Castle in the Sky".to_string(),
            original_title: Some("天空の城ラピュタ".to_string()),
            original_title_romanised: None,
            image: Some("https://example.test/poster.jpg".to_string()),
            movie_banner: None,
            description: None,
            director: Some("Hayao Miyazaki".to_string()),
            producer: None,
            release_date: Some("1986".to_string()),
            running_time: Some("124".to_string()),
            rt_score: Some("95".to_string()),
        }
    }

    fn not_found() -> QueryFailure {
        QueryFailure::new(ErrorKind::NotFound, "Film not found")
    }

    /// A card that has gone through a successful load.
    fn loaded() -> Card {
        let mut card = Card::new(config());
        let ticket = card.handle(Interaction::RequestLoad, Modality::Pointer).fetch.unwrap();
        assert_eq!(card.settle(&ticket, Ok(film())), Settlement::Loaded);
        card
    }

    #[test]
    fn starts_resting_on_the_front_face() {
        let card = Card::new(config());
        assert_eq!(card.state(), CardState::Resting);
        assert!(!card.is_flipped());
        assert_eq!(card.outcome(), &FetchOutcome::Idle);
        assert_eq!(
            card.face(),
            CardFace::Front {
                title: "Castle in the Sky",
                color: "#abcdef"
            }
        );
    }

    #[test]
    fn load_moves_to_loading_and_issues_one_ticket() {
        let mut card = Card::new(config());
        let t = card.handle(Interaction::RequestLoad, Modality::Touch);
        assert_eq!(t.from, CardState::Resting);
        assert_eq!(t.to, CardState::Loading);
        let ticket = t.fetch.unwrap();
        assert_eq!(ticket.film_id, config().id);
        assert_eq!(ticket.generation, 1);
        assert_eq!(card.face(), CardFace::Skeleton);
        assert!(card.is_flipped());
    }

    #[test]
    fn load_is_only_reachable_from_resting() {
        let mut card = Card::new(config());
        card.handle(Interaction::RequestLoad, Modality::Pointer);
        let again = card.handle(Interaction::RequestLoad, Modality::Pointer);
        assert!(again.is_noop());
        assert_eq!(card.generation(), 1);

        let mut card = loaded();
        assert!(card.handle(Interaction::RequestLoad, Modality::Pointer).is_noop());
        card.handle(Interaction::PointerEnter, Modality::Pointer);
        assert!(card.handle(Interaction::RequestLoad, Modality::Pointer).is_noop());
    }

    #[test]
    fn success_lands_in_loaded() {
        let card = loaded();
        assert_eq!(card.state(), CardState::Loaded);
        assert_eq!(card.film().unwrap().release_date.as_deref(), Some("1986"));
        assert_eq!(card.film().unwrap().rt_score.as_deref(), Some("95"));
        assert!(!card.is_expanded());
    }

    #[test]
    fn failure_lands_in_errored_with_message() {
        let mut card = Card::new(config());
        let ticket = card.handle(Interaction::RequestLoad, Modality::Pointer).fetch.unwrap();
        let settled = card.settle(&ticket, Err(not_found()));
        assert_eq!(
            settled,
            Settlement::Errored {
                message: "Film not found".to_string()
            }
        );
        assert_eq!(card.state(), CardState::Errored);
        assert_eq!(card.failure(), Some(&not_found()));
        assert_eq!(card.face(), CardFace::Error { message: "Film not found" });
    }

    #[test]
    fn errored_does_not_retry_on_its_own() {
        let mut card = Card::new(config());
        let ticket = card.handle(Interaction::RequestLoad, Modality::Pointer).fetch.unwrap();
        card.settle(&ticket, Err(not_found()));

        for interaction in [Interaction::RequestLoad, Interaction::PointerEnter, Interaction::PointerLeave] {
            let t = card.handle(interaction, Modality::Pointer);
            assert!(t.is_noop(), "{interaction:?}");
        }
        assert_eq!(card.state(), CardState::Errored);
    }

    #[test]
    fn press_resets_errored_under_either_modality() {
        for modality in [Modality::Pointer, Modality::Touch] {
            let mut card = Card::new(config());
            let ticket = card.handle(Interaction::RequestLoad, modality).fetch.unwrap();
            card.settle(&ticket, Err(not_found()));

            let t = card.handle(Interaction::Press, modality);
            assert_eq!(t.to, CardState::Resting);
            assert_eq!(card.outcome(), &FetchOutcome::Idle);

            let retry = card.handle(Interaction::RequestLoad, modality);
            assert_eq!(retry.fetch.unwrap().generation, 3);
        }
    }

    #[test]
    fn pointer_hover_toggles_without_refetch() {
        let mut card = loaded();
        for _ in 0..3 {
            let enter = card.handle(Interaction::PointerEnter, Modality::Pointer);
            assert_eq!(enter.to, CardState::Expanded);
            assert!(enter.fetch.is_none());
            assert!(card.is_expanded());

            let leave = card.handle(Interaction::PointerLeave, Modality::Pointer);
            assert_eq!(leave.to, CardState::Loaded);
            assert!(leave.fetch.is_none());
            assert!(!card.is_expanded());
        }
        assert_eq!(card.generation(), 1);
        assert_eq!(card.film(), Some(&film()));
    }

    #[test]
    fn hover_is_ignored_under_touch() {
        let mut card = loaded();
        assert!(card.handle(Interaction::PointerEnter, Modality::Touch).is_noop());
        card.handle(Interaction::Press, Modality::Touch);
        assert!(card.handle(Interaction::PointerLeave, Modality::Touch).is_noop());
        assert_eq!(card.state(), CardState::Expanded);
    }

    #[test]
    fn touch_tap_expands_then_collapses_to_resting() {
        let mut card = loaded();
        let t = card.handle(Interaction::Press, Modality::Touch);
        assert_eq!(t.to, CardState::Expanded);

        let t = card.handle(Interaction::Press, Modality::Touch);
        assert_eq!(t.to, CardState::Resting);
        assert_eq!(card.film(), None);

        let reload = card.handle(Interaction::RequestLoad, Modality::Touch);
        assert!(reload.fetch.is_some());
    }

    #[test]
    fn pointer_click_resets_from_loaded_and_expanded() {
        let mut card = loaded();
        assert_eq!(card.handle(Interaction::Press, Modality::Pointer).to, CardState::Resting);
        assert_eq!(card.film(), None);

        let mut card = loaded();
        card.handle(Interaction::PointerEnter, Modality::Pointer);
        assert_eq!(card.handle(Interaction::Press, Modality::Pointer).to, CardState::Resting);
        assert!(!card.is_expanded());
        assert_eq!(card.outcome(), &FetchOutcome::Idle);
    }

    #[test]
    fn nothing_reaches_expanded_without_loaded() {
        for modality in [Modality::Pointer, Modality::Touch] {
            let mut card = Card::new(config());
            for interaction in [Interaction::PointerEnter, Interaction::Press] {
                assert_ne!(card.handle(interaction, modality).to, CardState::Expanded);
            }
            card.handle(Interaction::RequestLoad, modality);
            for interaction in [Interaction::PointerEnter, Interaction::Press] {
                assert_eq!(card.handle(interaction, modality).to, CardState::Loading);
            }
        }
    }

    #[test]
    fn press_while_loading_is_ignored() {
        let mut card = Card::new(config());
        let ticket = card.handle(Interaction::RequestLoad, Modality::Pointer).fetch.unwrap();
        assert!(card.handle(Interaction::Press, Modality::Pointer).is_noop());
        assert_eq!(card.settle(&ticket, Ok(film())), Settlement::Loaded);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut card = Card::new(config());
        let ticket = card.handle(Interaction::RequestLoad, Modality::Pointer).fetch.unwrap();
        let stale = FetchTicket {
            generation: ticket.generation - 1,
            ..ticket.clone()
        };
        assert_eq!(card.settle(&stale, Ok(film())), Settlement::Stale);
        assert_eq!(card.state(), CardState::Loading);
        assert_eq!(card.settle(&ticket, Ok(film())), Settlement::Loaded);
    }

    #[test]
    fn result_after_settling_is_discarded() {
        let mut card = loaded();
        let ticket = FetchTicket {
            film_id: config().id,
            generation: card.generation(),
        };
        assert_eq!(card.settle(&ticket, Err(not_found())), Settlement::Stale);
        assert_eq!(card.state(), CardState::Loaded);
    }

    #[test]
    fn details_face_uses_placeholders() {
        let mut card = loaded();
        card.handle(Interaction::PointerEnter, Modality::Pointer);
        match card.face() {
            CardFace::Details { summary, expanded } => {
                assert!(expanded);
                assert_eq!(summary.title, "Castle in the Sky");
                assert_eq!(summary.description, "N/A");
                assert_eq!(summary.director, "Hayao Miyazaki");
                assert_eq!(summary.release, "1986");
                assert_eq!(summary.runtime, "124 min");
                assert_eq!(summary.score, "95%");
            }
            other => panic!("expected details, got {other:?}"),
        }
    }
}
