/// Lookup into the host's localization string store.
pub trait Localization {
    /// Never fails; implementations fall back to something displayable,
    /// usually the key itself.
    fn translate(&self, key: &str) -> String;
}
