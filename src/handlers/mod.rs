// handlers/mod.rs - HTTP handlers
//
// The notes routes sit behind an external authorization layer ("Private");
// root and health are public.
pub mod health;
pub mod notes;
pub mod root;
