//! Result type alias for config resolution operations

use crate::error::TsconfError;

/// Standard Result type for config resolution operations
pub type Result<T> = std::result::Result<T, TsconfError>;
