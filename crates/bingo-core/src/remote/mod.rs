//! Remote Store
//!
//! Supabase access: PostgREST for rows, the Realtime websocket protocol for
//! change notifications. The websocket itself lives with the browser code;
//! this module only builds and reads its frames.

pub mod postgrest;
pub mod realtime;

pub use postgrest::PostgrestRepository;
