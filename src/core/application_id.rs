//! Application identifier resolution

/// Supplies the application id stamped on entries that arrive without one
///
/// The logger consults its provider once, while it is being built, and
/// reuses the value for every dispatch.
pub trait ApplicationIdProvider: Send + Sync {
    fn application_id(&self) -> String;
}

/// A fixed application id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticApplicationId(String);

impl StaticApplicationId {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self(application_id.into())
    }
}

impl ApplicationIdProvider for StaticApplicationId {
    fn application_id(&self) -> String {
        self.0.clone()
    }
}

impl<F> ApplicationIdProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn application_id(&self) -> String {
        self()
    }
}

/// Application id used when neither a provider nor the configuration names one
pub const UNKNOWN_APPLICATION_ID: &str = "unknown";

/// Derive an application id from the running executable's file stem
pub fn application_id_from_executable() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_APPLICATION_ID.to_string())
}
