//! Output generation for lead sheets.
//!
//! # Submodules
//!
//! - [`table`]: in-memory [`table::Table`] with CSV load and save
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── restaurants_New_York_Buffalo_leads.csv   # scrape
//! └── cleaned_restaurants_output.csv           # clean
//! ```

pub mod table;
