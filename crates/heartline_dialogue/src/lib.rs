//! # Heartline dialogue
//!
//! Where character replies come from and how a turn is carried out.
//!
//! A [`ConversationProvider`] writes the character's line: the OpenAI-compatible
//! [`providers::OpenAiProvider`] when a key is configured, otherwise the
//! roster's static tables. [`ConversationService`] wraps a provider, a store
//! and the relationship engine into a single `take_turn` call.

pub mod prompts;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod service;

pub use provider::{ConversationProvider, ConversationRequest};
pub use providers::build_provider;
pub use service::{ConversationService, TurnReport};
