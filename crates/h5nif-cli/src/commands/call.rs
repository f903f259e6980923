//! Call command - dispatch one host function

use anyhow::{bail, Context, Result};
use colored::Colorize;
use h5nif_config::Config;
use h5nif_runtime::{Datatypes, NifModule, Term};
use std::sync::Arc;

/// Parse the arguments, dispatch, print the resulting term
pub fn run(config: &Config, function: &str, args: &[String], json: bool) -> Result<()> {
    let datatypes = Datatypes::from_config(config)
        .with_context(|| format!("Failed to open the {} backend", config.backend()))?;
    let module = NifModule::h5t(Arc::new(datatypes))?;

    let terms: Vec<Term> = args.iter().map(|arg| Term::parse_literal(arg)).collect();
    let result = module.call(function, &terms);

    if json {
        println!("{}", serde_json::to_string_pretty(&result.to_json())?);
    } else if result.is_ok() {
        println!("{}", result.to_string().green());
    } else {
        println!("{}", result.to_string().red());
    }

    if let Some(message) = result.error_message() {
        bail!("{}/{}: {}", function, terms.len(), message);
    }
    Ok(())
}
