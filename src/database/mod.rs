pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryNoteRepository;
pub use models::{NewNote, Note, NoteWithUser, User};
pub use postgres::PgNoteRepository;
pub use repository::NoteRepository;
