use thiserror::Error;

/// Failures raised by the driver itself rather than by the computation.
///
/// A driven computation's failure type must be convertible from this, so these
/// surface through the same rejection as any other failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriveError {
    /// The computation, or a thunk it yielded, panicked while being resumed.
    #[error("computation panicked: {message}")]
    Panicked { message: String },

    /// A plain value was yielded while the driver runs in strict mode.
    #[error("yielded a plain value with nothing to await")]
    UnawaitedValue,
}

/// Ready-made failure type for driven computations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Drive(#[from] DriveError),

    #[error("rejected: {0}")]
    Rejected(String),
}

impl DriveError {
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        DriveError::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payloads_become_messages() {
        let owned = DriveError::from_panic(Box::new(String::from("owned")));
        let borrowed = DriveError::from_panic(Box::new("borrowed"));
        let other = DriveError::from_panic(Box::new(7_u8));

        assert_eq!(owned.to_string(), "computation panicked: owned");
        assert_eq!(borrowed.to_string(), "computation panicked: borrowed");
        assert!(matches!(other, DriveError::Panicked { message } if message.contains("non-string")));
    }

    #[test]
    fn test_error_wraps_drive_errors_transparently() {
        let error: Error = DriveError::UnawaitedValue.into();
        assert_eq!(error.to_string(), "yielded a plain value with nothing to await");
    }
}
