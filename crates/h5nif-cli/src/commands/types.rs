//! Types command - list the supported type names

use anyhow::Result;
use h5nif_runtime::h5t::TYPE_TABLE;

/// Print the type table
pub fn run(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&TYPE_TABLE[..])?);
        return Ok(());
    }

    println!("{}", render());
    Ok(())
}

/// Fixed-width listing: name, class, size in bytes
fn render() -> String {
    let width = TYPE_TABLE
        .iter()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!(
        "{:width$}  {:13}  {}",
        "NAME",
        "CLASS",
        "SIZE",
        width = width
    )];
    for entry in TYPE_TABLE.iter() {
        lines.push(format!(
            "{:width$}  {:13}  {}",
            entry.name,
            entry.class.constant_name(),
            entry.size,
            width = width
        ));
    }
    lines.join("\n")
}
