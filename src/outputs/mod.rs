//! Output generation for rendered dashboard pages.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders the dashboard page (filters, cards or error banner)
//!   as Markdown for the terminal
//! - [`json`]: Exports successful pages as JSON snapshots
//!
//! # Output Structure
//!
//! ```text
//! stdout                       # one Markdown page per render pass
//!
//! json_output_dir/             # only with --json-output-dir
//! └── 2025-05-06/
//!     ├── finance.json
//!     └── stock-market.json
//! ```

pub mod json;
pub mod markdown;
