//! # Cutwise
//!
//! Retrieval-grounded haircut recipe generation: hybrid (vector + keyword)
//! search over a corpus of styling theory chunks and recipe samples,
//! multilingual prompt assembly, and generation through an external model,
//! exposed as a CLI and a JSON HTTP server.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌─────────────────────┐   ┌────────────┐
//! │  Request   │──▶│ embed ─┬─ vector ─┐ │──▶│  Prompt    │
//! │ (params /  │   │        │          ├─┼──▶│ assembly   │──▶ generate ──▶ redact
//! │  query)    │   │        └─ keyword ┘ │   │ (6 stages) │
//! └────────────┘   │     hybrid merge    │   └────────────┘
//!                  └─────────────────────┘
//! ```
//!
//! A failed embedding call degrades to keyword-only retrieval; prompt
//! assembly always succeeds; only generation failures surface to callers.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`corpus`] | JSON corpus loading and normalization |
//! | [`embedding`] | Gemini/OpenAI embedding providers |
//! | [`generation`] | Chat-completion client (atomic + streaming) |
//! | [`pipeline`] | Per-request orchestration |
//! | [`server`] | JSON HTTP server |

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod generation;
pub mod pipeline;
pub mod server;
