/// CLI argument definitions via clap derive.
use clap::Parser;

/// macblk — list block devices on macOS, lsblk-style.
///
/// With no arguments, prints a tree of all devices with the default columns.
#[derive(Debug, Parser)]
#[command(
    name = "macblk",
    about = "List information about block devices",
    version
)]
pub struct Cli {
    /// Comma-separated ordered list of output columns.
    /// Recognized: NAME, SIZE, TYPE, FSTYPE, LABEL, UUID, MOUNTPOINT, RO, RM, TRAN.
    #[arg(short = 'o', long = "output", value_name = "COLS")]
    pub output: Option<String>,

    /// Output format: tree, table, json, or raw (case-insensitive).
    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        default_value = "tree"
    )]
    pub format: String,

    /// Shorthand for --format json.
    #[arg(short = 'J', long = "json", conflicts_with = "format")]
    pub json: bool,

    /// Sort by column, within each level of the tree.
    #[arg(short = 'x', long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Also list empty devices.
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Print the SIZE column in bytes rather than in a human-readable format.
    #[arg(short = 'b', long = "bytes")]
    pub bytes: bool,

    /// Print whole disks only, without partitions or volumes.
    #[arg(short = 'd', long = "nodeps")]
    pub nodeps: bool,

    /// Exclude the whole disks named in this comma-separated list.
    #[arg(short = 'e', long = "exclude", value_name = "LIST")]
    pub exclude: Option<String>,

    /// Only include the whole disks named in this comma-separated list.
    #[arg(
        short = 'I',
        long = "include",
        value_name = "LIST",
        conflicts_with = "exclude"
    )]
    pub include: Option<String>,

    /// Use ASCII characters for tree formatting.
    #[arg(short = 'i', long = "ascii")]
    pub ascii: bool,

    /// Do not print a header line.
    #[arg(short = 'n', long = "noheadings")]
    pub no_headings: bool,

    /// Print full device paths (/dev/diskN).
    #[arg(short = 'p', long = "paths")]
    pub paths: bool,

    /// Output filesystem columns (NAME, FSTYPE, LABEL, UUID, MOUNTPOINT).
    #[arg(long = "fs", conflicts_with = "output")]
    pub fs: bool,

    /// Print pipeline stage timing to stderr.
    #[arg(long)]
    pub debug: bool,
}
