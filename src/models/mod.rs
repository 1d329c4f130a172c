pub mod book;
pub mod user;

pub use book::{Book, BookInput, BookStatus, BookUpdate, NewBook, UNKNOWN_AUTHOR};
pub use user::{User, UserSummary};
