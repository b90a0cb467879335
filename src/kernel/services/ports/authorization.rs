/// Permission check against the host's authorization layer. The workspace
/// only reads the flags; enforcement happens elsewhere.
pub trait Authorization {
    fn user_has_capability(&self, name: &str) -> bool;
}
