use kuma_find_infra::InfraError;
use kuma_find_shared::ErrorKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    NotResolved = 1,
    InvalidInput = 2,
    Io = 3,
}

impl ExitCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug)]
pub enum CliError {
    Infra(InfraError),
    Io(std::io::Error),
}

impl CliError {
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Infra(error) => match error.kind {
                ErrorKind::Expected => ExitCode::InvalidInput,
                ErrorKind::Invariant | ErrorKind::Unexpected => ExitCode::Io,
            },
            Self::Io(_) => ExitCode::Io,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infra(error) => write!(formatter, "{error}"),
            Self::Io(error) => write!(formatter, "io error: {error}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<InfraError> for CliError {
    fn from(error: InfraError) -> Self {
        Self::Infra(error)
    }
}
