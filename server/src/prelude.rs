pub use crate::app::App;
pub use tabula_types::error::{ClResult, Error};
pub use tabula_types::types::{Patch, SettingId, Timestamp};
pub use tabula_types::value::SettingValue;

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
