//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own input validation and backend calls so route handlers
//! can stay focused on protocol translation. The chat assistant lives in
//! [`crate::assistant`]; this module holds the stateless image editor.

pub mod image_edit;
