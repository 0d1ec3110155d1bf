use anyhow::{Context, Result};
use polytrim::Profile;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ProfileArgs) -> Result<()> {
    let config = Profile::from(args.profile).config();
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize profile")?;
    println!("{json}");
    Ok(())
}
