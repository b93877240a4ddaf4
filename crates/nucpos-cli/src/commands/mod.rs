pub mod insert;
pub mod landscape;

use crate::cli::ModelArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nucpos::core::models::key::{ModelKey, Order};
use nucpos::engine::error::NucposError;
use nucpos::workflows::landscape::{self as landscape_workflow, LandscapeResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn model_key(args: &ModelArgs) -> Result<ModelKey> {
    let order = Order::try_from(args.order).map_err(NucposError::from)?;
    let name = parser::parse_model_name(&args.model)?;
    Ok(ModelKey::new(order, name.model, name.temperature))
}

fn emit_report(results: &[LandscapeResult], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| CliError::Output {
                path: path.to_path_buf(),
                source: e,
            })?;
            let mut writer = landscape_workflow::write_report(results, BufWriter::new(file))?;
            writer.flush().map_err(|e| CliError::Output {
                path: path.to_path_buf(),
                source: e,
            })?;
            info!("Report written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            landscape_workflow::write_report(results, stdout.lock())?.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(order: u8, model: &str) -> ModelArgs {
        ModelArgs {
            order,
            model: model.to_string(),
            kt: None,
            data_root: None,
            output: None,
        }
    }

    #[test]
    fn model_key_combines_order_and_name() {
        let key = model_key(&args(3, "olson@298")).unwrap();
        assert_eq!(key, ModelKey::new(Order::Tri, "olson", "298"));
    }

    #[test]
    fn model_key_rejects_bad_order_and_name() {
        assert!(matches!(
            model_key(&args(4, "crick@310")),
            Err(CliError::Nucpos(NucposError::Order(_)))
        ));
        assert!(matches!(
            model_key(&args(2, "crick")),
            Err(CliError::Argument(_))
        ));
    }
}
