//! Grievance Desk - conversational intake for municipal complaints
//!
//! A citizen chats with the service; each turn is normalized, classified,
//! and run through a language-model extraction step that fills the
//! complaint slots. A dialogue policy then picks the next move (ask,
//! confirm, register, reset) and the reply is drafted or chosen from fixed
//! text. Oracle failures degrade to scripted fallbacks instead of errors.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
