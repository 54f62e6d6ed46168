//! Bundled log providers
//!
//! Every provider implements [`LogProvider`](crate::core::LogProvider) and
//! carries its own minimum level, which the dispatcher checks before writing.

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "network")]
pub mod network;
pub mod null;

#[cfg(feature = "console")]
pub use console::ConsoleProvider;
#[cfg(feature = "file")]
pub use file::FileProvider;
#[cfg(feature = "network")]
pub use network::NetworkProvider;
pub use null::NullLogProvider;

pub use crate::core::LogProvider;
