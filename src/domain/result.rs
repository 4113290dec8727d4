//! Result type alias for courtside

use super::errors::CourtsideError;

/// Result type alias for courtside operations
///
/// # Examples
///
/// ```
/// use courtside::domain::result::Result;
/// use courtside::domain::errors::CourtsideError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CourtsideError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CourtsideError>;
