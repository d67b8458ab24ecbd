//! Terminal presentation: view models, formatting and ANSI rendering.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → String
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready types computed from application state
//! - [`renderer`]: Turns a view model into styled text
//! - [`helpers`]: Currency, date and star formatting plus match highlighting
//! - [`theme`]: Color palette and ANSI escape sequences

pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{DetailPanel, EmptyState, FooterInfo, HeaderInfo, ProductCard, UIViewModel};
