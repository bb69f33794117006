/// Recognized output columns and formats.
///
/// Both are closed sets validated at the request boundary, so unknown names
/// fail fast with a named error before any device query happens.
use std::fmt;
use std::str::FromStr;

use super::errors::RenderError;

/// An output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Device identifier.
    Name,
    /// Device size.
    Size,
    /// Device kind (disk/part/volume/virtual).
    Type,
    /// Filesystem type.
    FsType,
    /// Volume label or media name.
    Label,
    /// Volume or disk UUID.
    Uuid,
    /// Mount path.
    MountPoint,
    /// Read-only flag (0/1).
    ReadOnly,
    /// Removable flag (0/1).
    Removable,
    /// Bus/interconnect protocol.
    Transport,
}

impl Column {
    /// Every recognized column.
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Size,
        Self::Type,
        Self::FsType,
        Self::Label,
        Self::Uuid,
        Self::MountPoint,
        Self::ReadOnly,
        Self::Removable,
        Self::Transport,
    ];

    /// Default column selection.
    pub const DEFAULT: [Self; 4] = [Self::Name, Self::Size, Self::Type, Self::MountPoint];

    /// Column preset for `--fs`.
    pub const FS: [Self; 5] = [
        Self::Name,
        Self::FsType,
        Self::Label,
        Self::Uuid,
        Self::MountPoint,
    ];

    /// The header cell, matching the Linux reference tool's naming.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Size => "SIZE",
            Self::Type => "TYPE",
            Self::FsType => "FSTYPE",
            Self::Label => "LABEL",
            Self::Uuid => "UUID",
            Self::MountPoint => "MOUNTPOINT",
            Self::ReadOnly => "RO",
            Self::Removable => "RM",
            Self::Transport => "TRAN",
        }
    }

    /// The JSON object key for this column.
    #[must_use]
    pub fn json_key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Type => "type",
            Self::FsType => "fstype",
            Self::Label => "label",
            Self::Uuid => "uuid",
            Self::MountPoint => "mountpoint",
            Self::ReadOnly => "ro",
            Self::Removable => "rm",
            Self::Transport => "tran",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, RenderError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NAME" => Ok(Self::Name),
            "SIZE" => Ok(Self::Size),
            "TYPE" => Ok(Self::Type),
            "FSTYPE" => Ok(Self::FsType),
            "LABEL" => Ok(Self::Label),
            "UUID" => Ok(Self::Uuid),
            "MOUNTPOINT" => Ok(Self::MountPoint),
            "RO" => Ok(Self::ReadOnly),
            "RM" => Ok(Self::Removable),
            "TRAN" => Ok(Self::Transport),
            _ => Err(RenderError::UnknownColumn(s.trim().to_owned())),
        }
    }
}

/// Parse a comma-separated ordered column list.
///
/// # Errors
///
/// Returns `RenderError::UnknownColumn` naming the first unrecognized entry.
pub fn parse_columns(list: &str) -> Result<Vec<Column>, RenderError> {
    list.split(',').map(str::parse).collect()
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented tree with branch glyphs (default).
    #[default]
    Tree,
    /// Flat aligned table, same traversal order, no glyphs.
    Table,
    /// Nested JSON.
    Json,
    /// Tab-separated raw values for machine consumption.
    Raw,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, RenderError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "raw" => Ok(Self::Raw),
            _ => Err(RenderError::UnknownFormat(s.trim().to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns_ordered_and_case_insensitive() {
        let columns = parse_columns("name,UUID, size").unwrap();
        assert_eq!(columns, vec![Column::Name, Column::Uuid, Column::Size]);
    }

    #[test]
    fn test_unknown_column_is_named() {
        let err = parse_columns("NAME,BOGUS").unwrap_err();
        assert!(matches!(err, RenderError::UnknownColumn(ref c) if c == "BOGUS"));
        assert!(err.to_string().contains("BOGUS"));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("TREE".parse::<OutputFormat>().unwrap(), OutputFormat::Tree);
        assert_eq!("Json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(RenderError::UnknownFormat(ref f)) if f == "yaml"
        ));
    }

    #[test]
    fn test_headers_match_reference_tool() {
        assert_eq!(Column::ReadOnly.header(), "RO");
        assert_eq!(Column::MountPoint.json_key(), "mountpoint");
        assert_eq!(Column::ALL.len(), 10);
    }
}
