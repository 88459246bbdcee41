//! Host for the cards on the home page.
//!
//! # Design
//! The board owns every mounted `Card`, runs the fetches they ask for, and
//! feeds results back in. Lookups are blocking, so each one runs on Tokio's
//! blocking pool and reports over an mpsc channel. Card state is only ever
//! touched from the task that owns the board.
//!
//! A result is tagged with the mount instance of the card that asked for it
//! and the card's fetch generation. If that card has been unmounted (or
//! unmounted and mounted again) by the time the result arrives, the result is
//! dropped.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::card::{Card, CardState, FetchTicket, Interaction, Modality, Settlement, Transition};
use crate::error::{ErrorKind, SERVER_ERROR};
use crate::notify::NotificationSink;
use crate::query::{FilmLookup, QueryFailure};
use crate::types::{catalogue, Film, FilmConfig};

struct Mounted {
    instance: u64,
    card: Card,
}

struct Settled {
    instance: u64,
    ticket: FetchTicket,
    result: Result<Film, QueryFailure>,
}

/// Why `Board::interact` refused an interaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("no card mounted for film {0}")]
    NotMounted(String),

    /// Fetches run on Tokio; without a runtime the card is left untouched.
    #[error("board interactions need a running Tokio runtime")]
    NoRuntime,
}

/// What happened to one fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Applied { film_id: String, state: CardState },
    Discarded { film_id: String },
}

pub struct Board<L, S> {
    lookup: Arc<L>,
    sink: S,
    cards: Vec<Mounted>,
    next_instance: u64,
    in_flight: usize,
    tx: mpsc::UnboundedSender<Settled>,
    rx: mpsc::UnboundedReceiver<Settled>,
}

impl<L, S> Board<L, S>
where
    L: FilmLookup + 'static,
    S: NotificationSink,
{
    pub fn new(lookup: Arc<L>, sink: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            lookup,
            sink,
            cards: Vec::new(),
            next_instance: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// A board with one resting card per catalogue entry.
    pub fn with_catalogue(lookup: Arc<L>, sink: S) -> Self {
        let mut board = Self::new(lookup, sink);
        for config in catalogue() {
            board.mount(config);
        }
        board
    }

    /// Mount a fresh card. Returns false if a card for that film is already
    /// mounted.
    pub fn mount(&mut self, config: FilmConfig) -> bool {
        if self.card(&config.id).is_some() {
            return false;
        }
        self.next_instance += 1;
        self.cards.push(Mounted {
            instance: self.next_instance,
            card: Card::new(config),
        });
        true
    }

    /// Tear a card down. A fetch it still has in flight will be discarded.
    pub fn unmount(&mut self, film_id: &str) -> Option<Card> {
        let index = self.cards.iter().position(|m| m.card.config().id == film_id)?;
        Some(self.cards.remove(index).card)
    }

    pub fn card(&self, film_id: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|m| m.card.config().id == film_id)
            .map(|m| &m.card)
    }

    /// Mounted cards in mount order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().map(|m| &m.card)
    }

    /// Fetches issued but not yet collected by `settle_next`.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Route an interaction to a card and start its fetch if it asked for one.
    pub fn interact(
        &mut self,
        film_id: &str,
        interaction: Interaction,
        modality: Modality,
    ) -> Result<Transition, BoardError> {
        let runtime = Handle::try_current().map_err(|_| BoardError::NoRuntime)?;
        let mounted = self
            .cards
            .iter_mut()
            .find(|m| m.card.config().id == film_id)
            .ok_or_else(|| BoardError::NotMounted(film_id.to_string()))?;

        let transition = mounted.card.handle(interaction, modality);
        if let Some(ticket) = &transition.fetch {
            let instance = mounted.instance;
            self.spawn_fetch(&runtime, instance, ticket.clone());
        }
        Ok(transition)
    }

    fn spawn_fetch(&mut self, runtime: &Handle, instance: u64, ticket: FetchTicket) {
        self.in_flight += 1;
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let id = ticket.film_id.clone();

        runtime.spawn(async move {
            let result = match tokio::task::spawn_blocking(move || lookup.film(&id)).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(error = %err, "film lookup task failed");
                    Err(QueryFailure::new(ErrorKind::ServerError, SERVER_ERROR))
                }
            };
            // The board may already be gone; nothing to deliver to then.
            let _ = tx.send(Settled {
                instance,
                ticket,
                result,
            });
        });
    }

    /// Wait for the next fetch to finish and apply it. Returns `None` when no
    /// fetch is in flight.
    pub async fn settle_next(&mut self) -> Option<Delivery> {
        if self.in_flight == 0 {
            return None;
        }
        let settled = self.rx.recv().await?;
        self.in_flight -= 1;

        let film_id = settled.ticket.film_id.clone();
        let Some(mounted) = self.cards.iter_mut().find(|m| m.instance == settled.instance) else {
            tracing::debug!(film_id = %film_id, "card unmounted before its fetch finished");
            return Some(Delivery::Discarded { film_id });
        };

        match mounted.card.settle(&settled.ticket, settled.result) {
            Settlement::Loaded => Some(Delivery::Applied {
                film_id,
                state: CardState::Loaded,
            }),
            Settlement::Errored { message } => {
                self.sink.notify(&message);
                Some(Delivery::Applied {
                    film_id,
                    state: CardState::Errored,
                })
            }
            Settlement::Stale => Some(Delivery::Discarded { film_id }),
        }
    }

    /// Drain every in-flight fetch.
    pub async fn settle_all(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        while let Some(delivery) = self.settle_next().await {
            deliveries.push(delivery);
        }
        deliveries
    }
}
