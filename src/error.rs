use thiserror::Error;

/// The only user-visible failure: `at`-style lookups on a key that holds no
/// value. Absent-prefix queries (`find`, `count`, `contains`, `remove`) are
/// not errors; they return empty/zero/false/0 instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("requested key not found")]
    KeyNotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
