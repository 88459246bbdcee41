//! Film catalogue client and card interaction core.
//!
//! # Overview
//! Fetches Studio Ghibli films from the upstream catalogue, classifies every
//! upstream failure into a small closed set of kinds, and drives the
//! interaction state of the film cards that display them.
//!
//! # Design
//! - `GhibliClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values; the round-trip goes through an injected `Transport`
//!   (`UreqTransport` in production).
//! - `classify` is the only place that interprets upstream failures.
//! - `FilmQuery` is the query boundary: callers get a `Film` or a
//!   `QueryFailure { code, message }`, never the underlying error.
//! - `Card` is a pure state machine. `Board` hosts cards, runs their fetches
//!   and drops results that arrive for cards that are gone.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod board;
pub mod card;
pub mod client;
pub mod error;
pub mod http;
pub mod normalize;
pub mod notify;
pub mod query;
pub mod remote;
pub mod transport;
pub mod types;

pub use board::{Board, BoardError, Delivery};
pub use card::{
    Card, CardFace, CardState, FetchOutcome, FetchTicket, FilmSummary, Interaction, Modality, Settlement, Transition,
};
pub use client::{GhibliClient, DEFAULT_BASE_URL};
pub use error::{classify, DomainError, ErrorKind, UpstreamError};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError};
pub use normalize::normalize;
pub use notify::{NotificationSink, Severity, Toast, ToastQueue, AUTO_HIDE};
pub use query::{FilmLookup, FilmQuery, QueryFailure};
pub use remote::RemoteLookup;
pub use transport::UreqTransport;
pub use types::{catalogue, Film, FilmConfig, FilmRecord};
