//! Inspect command - copy a predefined type, query it, close it

use anyhow::{anyhow, Context, Result};
use h5nif_config::Config;
use h5nif_runtime::ffi::types::{ByteOrder, DatatypeClass};
use h5nif_runtime::{Datatypes, H5tResult, TypeHandle};
use serde::Serialize;

/// A raw enumerator and its constant name, if known
#[derive(Debug, Serialize)]
struct Enumerator {
    id: i32,
    name: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Report {
    type_name: String,
    backend: String,
    handle: i64,
    class: Enumerator,
    order: Enumerator,
    size: usize,
}

/// Run the full bridge path on one type name
pub fn run(config: &Config, type_name: &str, json: bool) -> Result<()> {
    let datatypes = Datatypes::from_config(config)
        .with_context(|| format!("Failed to open the {} backend", config.backend()))?;

    let report = inspect(&datatypes, type_name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} ({})", report.type_name, report.backend);
        println!("  handle: {}", report.handle);
        println!("  class:  {}", describe(&report.class));
        println!("  order:  {}", describe(&report.order));
        println!("  size:   {}", report.size);
    }
    Ok(())
}

fn inspect(datatypes: &Datatypes, type_name: &str) -> Result<Report> {
    let handle = datatypes
        .copy(type_name)
        .map_err(|e| anyhow!("{}: {}", type_name, e))?;
    let id = handle.id();

    // Query first, close regardless, then report the first failure
    let queried = query(datatypes, &handle);
    let closed = datatypes.close(handle);
    let (class, order, size) = queried.map_err(|e| anyhow!("{}: {}", type_name, e))?;
    closed.map_err(|e| anyhow!("{}: {}", type_name, e))?;

    Ok(Report {
        type_name: type_name.to_string(),
        backend: datatypes.library().describe(),
        handle: id,
        class: Enumerator {
            id: class,
            name: DatatypeClass::from_raw(class).map(DatatypeClass::constant_name),
        },
        order: Enumerator {
            id: order,
            name: ByteOrder::from_raw(order).map(ByteOrder::constant_name),
        },
        size,
    })
}

fn query(datatypes: &Datatypes, handle: &TypeHandle) -> H5tResult<(i32, i32, usize)> {
    Ok((
        datatypes.get_class(handle)?,
        datatypes.get_order(handle)?,
        datatypes.get_size(handle)?,
    ))
}

fn describe(value: &Enumerator) -> String {
    match value.name {
        Some(name) => format!("{} ({})", name, value.id),
        None => format!("unknown ({})", value.id),
    }
}
