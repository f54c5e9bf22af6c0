use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": false,
///   "data": {},
///   "message": "Session has expired",
///   "code": "SessionExpired"
/// }
/// ```
///
/// `code` is only present on failures that carry a machine-readable kind.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Placeholder payload for responses without data.
#[derive(Serialize, Default, Debug, Clone, Copy)]
pub struct Empty {}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            code: None,
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            code: None,
        }
    }

    pub fn error_with_code(message: impl Into<String>, code: &'static str) -> Self
    where
        T: Default,
    {
        Self {
            code: Some(code),
            ..Self::error(message)
        }
    }
}
