use thiserror::Error;

/// Which side of the API boundary an error is attributable to.
///
/// The API framework picks its error envelope from this: a client error
/// becomes an invalid-filter response, a server error a configuration fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

#[derive(Error, Debug)]
pub enum EavError {
    #[error("No family governs resource type '{resource}'")]
    UnresolvedFamily { resource: String },

    #[error("Resource type '{resource}' is backed by several families ({}); pin the filter to one", .families.join(", "))]
    AmbiguousFamily {
        resource: String,
        families: Vec<String>,
    },

    #[error("Unknown family '{code}'")]
    UnknownFamily { code: String },

    #[error("Resource type '{resource}' not matching family '{family}' (backs '{data_class}')")]
    FamilyMismatch {
        resource: String,
        family: String,
        data_class: String,
    },

    #[error("Unknown attribute '{attribute}' in family '{family}'")]
    UnknownAttribute { family: String, attribute: String },

    #[error("Ambiguous or missing allowed_families for attribute '{attribute}'")]
    UnexpectedSchema { attribute: String },

    #[error("No filter named '{name}'")]
    UnknownFilter { name: String },

    #[error("Strategy {0} does not exist")]
    InvalidStrategy(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

impl EavError {
    pub fn unknown_attribute(family: &str, attribute: &str) -> Self {
        EavError::UnknownAttribute {
            family: family.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            EavError::UnknownAttribute { .. } => ErrorClass::Client,
            _ => ErrorClass::Server,
        }
    }
}

pub type Result<T> = std::result::Result<T, EavError>;
