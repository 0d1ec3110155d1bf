use std::path::PathBuf;

use polytrim::Profile;

/// Polygon trimming CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "polytrim", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge undersized and sliver polygons in GeoJSON files
    Trim(TrimArgs),

    /// Print a built-in profile as JSON (a starting point for --config)
    Profile(ProfileArgs),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, clap::ValueEnum)]
pub enum ProfileName { Chu, Shokusei }

impl From<ProfileName> for Profile {
    fn from(name: ProfileName) -> Self {
        match name {
            ProfileName::Chu => Profile::Chu,
            ProfileName::Shokusei => Profile::Shokusei,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct TrimArgs {
    /// Glob pattern locating input GeoJSON files (`**` is recursive)
    #[arg(short, long)]
    pub geojson_pattern: String,

    /// Directory for output files, defaults to "data/geojson-trimmed/<profile>"
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub out: Option<PathBuf>,

    /// Classification granularity to trim for
    #[arg(short = 'k', long, value_enum)]
    pub profile: ProfileName,

    /// JSON configuration replacing the built-in profile
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ProfileArgs {
    /// Profile to print
    #[arg(value_enum)]
    pub profile: ProfileName,
}
