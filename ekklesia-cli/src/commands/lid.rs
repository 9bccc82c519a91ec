//! Sortable identifier tools.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use ekklesia_lid::Lid;

/// Print `count` fresh identifiers, one per line.
pub fn new_lids(count: usize) -> Result<()> {
    for _ in 0..count {
        let lid = Lid::new().context("Failed to generate identifier")?;
        println!("{lid}");
    }
    tracing::debug!("Generated {} identifiers", count);
    Ok(())
}

/// Print the integer value, timestamp and random part of `input`.
pub fn decode_lid(input: &str, json: bool) -> Result<()> {
    let lid: Lid = input
        .parse()
        .with_context(|| format!("'{}' is not a valid identifier", input))?;
    let created_at = lid.created_at().to_rfc3339_opts(SecondsFormat::Millis, true);

    if json {
        let payload = serde_json::json!({
            "lid": lid.to_string(),
            "value": lid.as_u64(),
            "milliseconds": lid.milliseconds(),
            "random": lid.random(),
            "created_at": created_at,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("lid:          {lid}");
        println!("value:        {}", lid.as_u64());
        println!("milliseconds: {}", lid.milliseconds());
        println!("random:       {}", lid.random());
        println!("created_at:   {created_at}");
    }
    Ok(())
}

pub fn encode_lid(value: u64) -> Result<()> {
    println!("{}", Lid::from_int(value));
    Ok(())
}
