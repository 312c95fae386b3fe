use anyhow::Result;

/// Durable key-value slots holding serialized store state.
pub trait StateStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;
}

pub trait Clipboard {
    /// Returns whether the text reached the clipboard.
    fn copy_text(&self, text: &str) -> bool;
}
