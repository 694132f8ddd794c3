//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  URL / .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  fetch + parse → Dataset (rows without a category dropped)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  Vec<Row>, sorted categories, colour map, size domain
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  categories + decoded range → FilteredView
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
