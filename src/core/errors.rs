use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    EmptyName,
    ParsePrice,
    ParseQuantity,
    ParseDate,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::EmptyName => write!(f, "customer name is empty"),
            CoreError::ParsePrice => write!(f, "failed to parse unit price"),
            CoreError::ParseQuantity => write!(f, "failed to parse quantity"),
            CoreError::ParseDate => write!(f, "failed to parse order date"),
        }
    }
}

impl std::error::Error for CoreError {}

#[derive(Debug)]
pub enum LoadError {
    Sqlite(rusqlite::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Sqlite(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Sqlite(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for LoadError {
    fn from(e: rusqlite::Error) -> Self {
        LoadError::Sqlite(e)
    }
}

#[derive(Debug)]
pub enum QueryError {
    UnknownCustomer(String),
    Sqlite(rusqlite::Error),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownCustomer(name) => write!(f, "unknown customer: {}", name),
            QueryError::Sqlite(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::UnknownCustomer(_) => None,
            QueryError::Sqlite(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for QueryError {
    fn from(e: rusqlite::Error) -> Self {
        QueryError::Sqlite(e)
    }
}

impl From<LoadError> for QueryError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Sqlite(inner) => QueryError::Sqlite(inner),
        }
    }
}
