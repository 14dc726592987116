//! Status command handler

use anyhow::Result;

use herdbook_core::{AnimalRepository, Operator};

use crate::output::{Output, OutputFormat};

/// Show where records live and what was skipped on load
pub fn show(repo: &AnimalRepository, operator: &Operator, output: &Output) -> Result<()> {
    let warnings = repo.load_warnings();

    match output.format {
        OutputFormat::Json => {
            let skipped: Vec<_> = warnings
                .iter()
                .map(|w| serde_json::json!({"line": w.line, "reason": w.issue.to_string()}))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "data_file": repo.location(),
                    "records": repo.len(),
                    "next_id": repo.next_id(),
                    "user": operator.username,
                    "role": operator.role,
                    "skipped_lines": skipped
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", repo.len());
        }
        OutputFormat::Human => {
            println!("Herdbook Status");
            println!("===============");
            println!();
            println!("Signed in as: {} ({})", operator.username, operator.role);
            println!();
            println!("Storage:");
            println!("  Data file: {}", repo.location());
            println!("  Records:   {}", repo.len());
            println!("  Next ID:   {}", repo.next_id());
            if !warnings.is_empty() {
                println!();
                println!("Skipped lines ({}):", warnings.len());
                for warning in warnings {
                    println!("  {}", warning);
                }
            }
        }
    }

    Ok(())
}
