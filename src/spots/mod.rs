pub mod error;
pub mod locator;
pub mod supabase;
