use super::cache::ConfigCache;
use super::state::ChatConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatConfigEffect {
    /// Overwrite the client-side cache with the given record.
    PersistCache(ConfigCache),
    /// Show a transient error notification.
    ShowError(ChatConfigError),
}
