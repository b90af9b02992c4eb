// handlers/notes - CRUD over the notes collection, all on the /notes path
//
// Each handler validates its typed body first, then issues one to three
// independent repository calls. Duplicate-title checks read before they
// write and are not atomic with the write.

pub mod create;
pub mod delete;
pub mod list;
pub mod types;
pub mod update;

pub use create::post as notes_post;
pub use delete::delete as notes_delete;
pub use list::get as notes_get;
pub use update::patch as notes_patch;

pub const NO_NOTES_FOUND: &str = "No notes found";
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const NOTE_ID_REQUIRED: &str = "Note ID required";
pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const DUPLICATE_TITLE: &str = "Duplicate note title";
