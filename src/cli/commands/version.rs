//! Version command implementation.

use anyhow::Result;

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    if json {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("ilens {}", env!("CARGO_PKG_VERSION"));
    }
    Ok(())
}
