//! Call-site metadata attached to log entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;

/// Where a log call was made
///
/// Rust has no implicit caller-member capture, so call sites pass this
/// explicitly. The [`caller_info!`](crate::caller_info) macro and
/// [`CallerInfo::here`] fill it in without spelling out the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerInfo {
    /// Enclosing member; the module path when captured by `caller_info!`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub line_number: u32,
}

impl CallerInfo {
    pub fn new(member_name: impl Into<String>, file_path: impl Into<String>, line_number: u32) -> Self {
        Self {
            member_name: Some(member_name.into()),
            file_path: Some(file_path.into()),
            line_number,
        }
    }

    /// Capture the location of the (tracked) caller
    ///
    /// The member name is unknown on this path; use the macro when it matters.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self {
            member_name: None,
            file_path: Some(location.file().to_string()),
            line_number: location.line(),
        }
    }

    /// True when nothing about the call site is known
    pub fn is_unknown(&self) -> bool {
        self.member_name.is_none() && self.file_path.is_none() && self.line_number == 0
    }
}

impl fmt::Display for CallerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file_path.as_deref().unwrap_or("<unknown>");
        match self.member_name {
            Some(ref member) => write!(f, "{} ({}:{})", member, file, self.line_number),
            None => write!(f, "{}:{}", file, self.line_number),
        }
    }
}

/// Capture the current call site as a [`CallerInfo`]
///
/// # Examples
///
/// ```
/// use log_dispatch::caller_info;
///
/// let caller = caller_info!();
/// assert_eq!(caller.file_path.as_deref(), Some(file!()));
/// ```
#[macro_export]
macro_rules! caller_info {
    () => {
        $crate::core::CallerInfo::new(module_path!(), file!(), line!())
    };
}
