/// State management module
///
/// This module handles all editing state, including:
/// - The pose document snapshot and shared data structures (data.rs)
/// - Touched-field tracking (changes.rs)
/// - Tag collection and pending tag input (tags.rs)
/// - Change payload construction (payload.rs)
/// - The editing session tying it all together (session.rs)

pub mod changes;
pub mod data;
pub mod payload;
pub mod session;
pub mod tags;
