//! `MindSignal` — idea refinement over interchangeable LLM providers.
//!
//! The core is [`llm`]: a prompt builder, a provider router, and one adapter
//! per backend, all speaking a single JSON result contract. The rest is the
//! service around it: idea storage, sessions and the HTTP API.

pub mod catalog;
pub mod db;
pub mod llm;
pub mod routes;
pub mod services;
pub mod state;
