use crate::NotestackResult;

/// Synchronous key-value persistence boundary.
///
/// Values are opaque strings (the domain writes JSON). A missing key is
/// `Ok(None)`, never an error.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> NotestackResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> NotestackResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> NotestackResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> NotestackResult<()> {
        (**self).set(key, value)
    }
}
