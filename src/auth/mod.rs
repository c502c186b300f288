pub(crate) mod extractors;

pub use extractors::{ActingUser, USER_ID_HEADER};
