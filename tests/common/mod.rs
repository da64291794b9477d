//! Common test utilities
//!
//! Shared across the integration suites: a transport that records every
//! outbound interaction, scripted search/resolver collaborators and byte
//! fixtures that pass (or fail) artifact validation.

// Re-export testing utilities
pub mod fixtures;
pub mod recorder;

#[allow(unused_imports)]
pub use fixtures::{
    media_host, mp3_fixture_bytes, mp4_fixture_bytes, search_hit, ScriptedResolver, ScriptedSearch,
};
#[allow(unused_imports)]
pub use recorder::{Outbound, RecordingTransport};
