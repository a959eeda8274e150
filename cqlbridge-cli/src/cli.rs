use clap::ValueEnum;
use cqlbridge_core::{ProtocolVersion, ValueSource};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Origin of bytes passed to `decode`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceArg {
    Client,
    Store,
}

impl From<SourceArg> for ValueSource {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Client => ValueSource::Client,
            SourceArg::Store => ValueSource::Store,
        }
    }
}

/// Parse a `--protocol-version` argument such as `4` or `v4`
pub fn parse_protocol_version(arg: &str) -> Result<ProtocolVersion, String> {
    let digits = arg.trim_start_matches(|c: char| c == 'v' || c == 'V');
    let number: u8 = digits
        .parse()
        .map_err(|_| format!("invalid protocol version '{}'", arg))?;
    ProtocolVersion::try_from(number).map_err(|e| e.to_string())
}
