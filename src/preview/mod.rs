/// Image preview module
///
/// This module handles:
/// - The preview handle capability and its iced implementation (host.rs)
/// - Display state, transient handle ownership and fit selection (lifecycle.rs)
/// - Asynchronous natural-dimension probing (probe.rs)

pub mod host;
pub mod lifecycle;
pub mod probe;
