//! Reference table mapping ISO country codes to UN M49 numeric codes,
//! including the alternate codes used by UN Comtrade and the aggregate
//! "non-country" regions (NES, Bunkers, Free Zones, Special Categories)
//! that appear in trade statistics.
//!
//! The packaged dataset is available process-wide via [`CodeTable::builtin`];
//! alternate dataset versions can be loaded side by side with
//! [`CodeTable::load_path`].

pub mod error;
pub mod record;
pub mod table;

pub use error::{DatasetError, LookupError, LookupKind};
pub use record::CountryRecord;
pub use table::{CodeTable, EXPECTED_HEADERS};
