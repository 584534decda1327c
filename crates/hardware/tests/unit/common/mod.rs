
/// Access types and their textual forms.
pub mod data;

/// Error messages.
pub mod error;
