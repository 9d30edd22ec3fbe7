//! Export command

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use envis_core::export_transactions_csv;

use super::Session;
use crate::cli::ViewArgs;

/// Export the filtered transaction view to CSV
pub fn cmd_export(session: &Session, output: Option<&Path>, view: &ViewArgs) -> Result<()> {
    let filter = session.filter(view);
    let csv = export_transactions_csv(&session.household.categories, &filter)?;

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            file.write_all(csv.as_bytes())?;

            let lines = csv.lines().count().saturating_sub(1); // Subtract header
            println!("✅ Exported {} transactions to {}", lines, path.display());
        }
        None => {
            // Write to stdout
            print!("{}", csv);
        }
    }

    Ok(())
}
