/// A column of a partial update row: either a new value or left untouched.
#[derive(Debug, Clone, Default)]
pub enum DbField<T> {
    Set(T),
    #[default]
    NotSet,
}
