//! Data layer: core types, loading, row selection and summaries.
//!
//! Architecture:
//! ```text
//!      train.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file, infer dtypes → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Column>, one dtype per column
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  summary  │   │  filter   │  dropna / hue groups → row indices
//!   └──────────┘   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
