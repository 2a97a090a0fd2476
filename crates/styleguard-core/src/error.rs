use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage an error surfaced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Extract,
    Validate,
    Compare,
    Annotate,
    Rewrite,
    Relationships,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Extract => "extract",
            Stage::Validate => "validate",
            Stage::Compare => "compare",
            Stage::Annotate => "annotate",
            Stage::Rewrite => "rewrite",
            Stage::Relationships => "relationships",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum StyleguardError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid OOXML package: {message}")]
    Package { message: String },

    #[error("Missing required part '{part_path}'")]
    MissingPart { part_path: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid rule set: {message}")]
    Validation { message: String },

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<StyleguardError>,
    },

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StyleguardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn package(message: impl Into<String>) -> Self {
        Self::Package {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wrap this error with the stage it crossed. Already-tagged errors keep
    /// their innermost stage.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            tagged @ Self::Stage { .. } => tagged,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StyleguardError>;

/// Attach a stage to the error side of a result.
pub trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T>;
}

impl<T> StageContext<T> for Result<T> {
    fn stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}
