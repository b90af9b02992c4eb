pub mod note;
pub mod user;

pub use note::{NewNote, Note, NoteWithUser};
pub use user::User;
