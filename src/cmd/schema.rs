//! Schema command: print JSON Schemas.

use crate::json_schema;
use anyhow::Result;
use serde_json::{Map, Value};

pub fn run(name: Option<String>) -> Result<()> {
    let output = match name {
        Some(name) => {
            let schema = json_schema::get_schema(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown schema: {}. Valid options: {}",
                    name,
                    json_schema::schema_names().join(", ")
                )
            })?;
            serde_json::to_value(schema)?
        }
        None => {
            let mut all = Map::new();
            for (name, schema) in json_schema::all_schemas() {
                all.insert(name.to_string(), serde_json::to_value(schema)?);
            }
            Value::Object(all)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
