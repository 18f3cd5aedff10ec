use uuid::Uuid;

/// Source of fresh todo ids.
///
/// Ids only need to be unique with overwhelming probability; the store still
/// re-draws when a generated id is already taken.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random (v4) UUIDs in hyphenated lowercase form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4;

impl IdGenerator for UuidV4 {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}
