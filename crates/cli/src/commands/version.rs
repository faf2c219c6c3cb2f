use anyhow::Result;

/// Execute the version command
pub fn execute() -> Result<()> {
    println!("mazeprobe {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
