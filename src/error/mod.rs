pub mod compile;

pub use compile::CompileError;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    Compile(CompileError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "compile error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(e) => Some(e),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compile(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_compile() {
        let compile_err = CompileError::InvalidFieldName("bad-name".to_string());
        let err = Error::from(compile_err.clone());
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn test_error_display() {
        let err = Error::Compile(CompileError::InvalidOperator("$foo".to_string()));
        assert_eq!(err.to_string(), "compile error: invalid operator: $foo");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error as _;

        let err = Error::Compile(CompileError::InvalidSort);
        assert!(err.source().is_some());
    }
}
