use std::{error::Error, fmt};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub struct PingError {
    pub message: String,
    pub source: Option<GenericError>,
}

impl PingError {
    pub fn new(message: impl Into<String>) -> Self {
        PingError { message: message.into(), source: None }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<GenericError>) -> Self {
        PingError { message: message.into(), source: Some(source.into()) }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PingError")?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

impl From<std::io::Error> for PingError {
    fn from(error: std::io::Error) -> PingError {
        PingError { message: error.to_string(), source: None }
    }
}
