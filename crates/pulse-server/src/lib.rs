//! # pulse-server
//!
//! axum HTTP surface over the update cache:
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | GET | `{prefix}/developments?refresh=true` | summarized payload |
//! | GET | `{prefix}/developments/raw?days=N` | unsummarized feed items |
//! | POST | `{prefix}/developments/cache/clear` | confirmation message |
//! | GET | `{prefix}/developments/cache/status` | cache introspection |
//! | GET | `/health` | liveness |

pub mod error;
pub mod routes;
pub mod state;

pub use error::{AppError, HttpError, MASKED_MESSAGE};
pub use routes::router;
pub use state::AppState;
