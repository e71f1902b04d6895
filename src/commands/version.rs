use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("rmt version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
