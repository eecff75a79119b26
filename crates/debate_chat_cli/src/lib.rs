//! Line-oriented terminal front end for `debate_chat`.
//!
//! ## Provider bootstrap
//!
//! `DEBATE_CHAT_PROVIDER` selects the completion provider:
//!
//! - `http` (default) talks to an OpenAI-compatible chat-completions endpoint
//! - `mock` replies offline with canned counter-arguments
//!
//! The HTTP provider reads its API key from `DEBATE_CHAT_API_KEY` when set,
//! otherwise from the `completion_api_key` entry of `secrets.json` in the
//! settings directory. `/key <value>` writes that entry from inside the
//! program. A missing key fails the turn, never the process.
//!
//! ## Settings directory
//!
//! `DEBATE_CHAT_HOME` overrides the platform config directory. It holds
//! `secrets.json`, `preferences.json` and the `debate-chat.log` trace file.

pub mod app;
pub mod commands;
pub mod config;
pub mod logging;
pub mod providers;
pub mod runtime;
pub mod surface;
