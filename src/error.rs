use std::fmt;
use std::path::PathBuf;

/// Structured errors surfaced by the alias core to the command-line layer
#[derive(Debug, Clone)]
pub enum QaError {
    /// A configuration directory could not be created
    DirectoryCreateError {
        dir_path: PathBuf,
        operation: String,
        underlying_error: String,
        context: String,
    },

    /// Reading, writing or removing a file failed
    FileOperationError {
        file_path: PathBuf,
        operation: String,
        underlying_error: String,
        context: String,
    },

    /// Alias data could not be serialized to JSON
    SerializeError {
        operation: String,
        underlying_error: String,
    },

    /// A JSON document could not be parsed
    ParseError {
        file_path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        context: String,
        underlying_error: String,
    },

    /// The home directory could not be determined
    HomeNotFound,

    /// Runtime error during operation
    RuntimeError {
        operation: String,
        context: String,
        underlying_error: String,
        suggestions: Vec<String>,
    },
}

impl fmt::Display for QaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QaError::DirectoryCreateError { dir_path, operation, underlying_error, context } => {
                write!(f, "Could not create directory\n")?;
                write!(f, "  Directory: {}\n", dir_path.display())?;
                write!(f, "  Operation: {}\n", operation)?;
                if !context.is_empty() {
                    write!(f, "  Context: {}\n", context)?;
                }
                write!(f, "  Error: {}\n", underlying_error)?;
                write!(f, "  \n")?;
                write!(f, "  Global aliases live in a system directory; you may need administrator privileges.")?;
                Ok(())
            }

            QaError::FileOperationError { file_path, operation, underlying_error, context } => {
                write!(f, "File operation failed\n")?;
                write!(f, "  File: {}\n", file_path.display())?;
                write!(f, "  Operation: {}\n", operation)?;
                if !context.is_empty() {
                    write!(f, "  Context: {}\n", context)?;
                }
                write!(f, "  Error: {}\n", underlying_error)?;
                write!(f, "  \n")?;
                write!(f, "  Check file permissions and disk space.")?;
                Ok(())
            }

            QaError::SerializeError { operation, underlying_error } => {
                write!(f, "Could not process alias data\n")?;
                write!(f, "  Operation: {}\n", operation)?;
                write!(f, "  Error: {}", underlying_error)?;
                Ok(())
            }

            QaError::ParseError { file_path, line, column, context, underlying_error } => {
                write!(f, "JSON parsing error in {}\n", file_path.display())?;
                if let (Some(line), Some(column)) = (line, column) {
                    write!(f, "  Location: line {}, column {}\n", line, column)?;
                } else if let Some(line) = line {
                    write!(f, "  Location: line {}\n", line)?;
                }
                if !context.is_empty() {
                    write!(f, "  Context: {}\n", context)?;
                }
                write!(f, "  Error: {}\n", underlying_error)?;
                write!(f, "  \n")?;
                write!(f, "  The file must contain a JSON array of {{name, command, created, level}} objects.")?;
                Ok(())
            }

            QaError::HomeNotFound => {
                write!(f, "Could not determine the home directory\n")?;
                write!(f, "  Set HOME, or point QUICKALIAS_USER_DIR at a writable directory.")
            }

            QaError::RuntimeError { operation, context, underlying_error, suggestions } => {
                write!(f, "Runtime error during {}\n", operation)?;
                if !context.is_empty() {
                    write!(f, "  Context: {}\n", context)?;
                }
                write!(f, "  Error: {}\n", underlying_error)?;
                if !suggestions.is_empty() {
                    write!(f, "  \n")?;
                    write!(f, "  Suggestions:\n")?;
                    for suggestion in suggestions {
                        write!(f, "    - {}\n", suggestion)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for QaError {}

/// Context builder for creating enhanced errors
pub struct ErrorContext {
    operation: String,
    file_path: Option<PathBuf>,
    alias_name: Option<String>,
    additional_context: Vec<String>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            file_path: None,
            alias_name: None,
            additional_context: Vec::new(),
        }
    }

    pub fn with_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias_name = Some(alias.to_string());
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.additional_context.push(context.to_string());
        self
    }

    fn joined_context(&self) -> String {
        let mut parts = Vec::new();
        if let Some(alias) = &self.alias_name {
            parts.push(format!("alias '{}'", alias));
        }
        parts.extend(self.additional_context.iter().cloned());
        parts.join("; ")
    }

    fn path_or_unknown(&self) -> PathBuf {
        self.file_path.clone().unwrap_or_else(|| PathBuf::from("unknown"))
    }

    pub fn to_directory_create_error(self, underlying_error: impl fmt::Display) -> QaError {
        QaError::DirectoryCreateError {
            dir_path: self.path_or_unknown(),
            context: self.joined_context(),
            operation: self.operation,
            underlying_error: underlying_error.to_string(),
        }
    }

    pub fn to_file_operation_error(self, underlying_error: impl fmt::Display) -> QaError {
        QaError::FileOperationError {
            file_path: self.path_or_unknown(),
            context: self.joined_context(),
            operation: self.operation,
            underlying_error: underlying_error.to_string(),
        }
    }

    pub fn to_serialize_error(self, underlying_error: impl fmt::Display) -> QaError {
        QaError::SerializeError {
            operation: self.operation,
            underlying_error: underlying_error.to_string(),
        }
    }

    pub fn to_parse_error(self, underlying_error: &serde_json::Error) -> QaError {
        let (line, column) = if underlying_error.line() > 0 {
            (Some(underlying_error.line()), Some(underlying_error.column()))
        } else {
            (None, None)
        };
        QaError::ParseError {
            file_path: self.path_or_unknown(),
            line,
            column,
            context: self.joined_context(),
            underlying_error: underlying_error.to_string(),
        }
    }

    pub fn to_runtime_error(self, underlying_error: impl fmt::Display, suggestions: Vec<String>) -> QaError {
        QaError::RuntimeError {
            context: self.joined_context(),
            operation: self.operation,
            underlying_error: underlying_error.to_string(),
            suggestions,
        }
    }
}
