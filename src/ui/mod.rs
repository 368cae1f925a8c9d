//! Terminal UI for interactive sessions.
//!
//! - [`chat_loop`]: terminal lifecycle, input handling and the event loop.
//! - [`renderer`]: frame composition from a conversation snapshot.
//! - [`theme`]: style policy.
//!
//! This layer only presents state; [`crate::core::conversation`] owns it.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
