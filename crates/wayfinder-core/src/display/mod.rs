//! Markdown rendering of models and screens.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! newtype wrappers format collections ([`collections`]) and whole screens
//! ([`screen`]). All output is Markdown, rendered by the CLI through its
//! terminal renderer or returned as-is over MCP.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │    Wrappers     │    │    Markdown     │
//! │ (Strategy, Step)│───▶│ (Strategies,    │───▶│     Output      │
//! │                 │    │  ScreenView)    │    │ (Terminal/MCP)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

pub mod collections;
pub mod models;
pub mod screen;
pub mod status;

pub use collections::{Resources, Strategies};
pub use screen::ScreenView;
pub use status::OperationStatus;
