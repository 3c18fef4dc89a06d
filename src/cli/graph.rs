use anyhow::{Context, Result};

use glp2report::graph;

/// Decode one payload and print it
pub fn run(payload: &str) -> Result<()> {
    let graph = graph::parse(payload).context("Failed to decode graph payload")?;

    println!("Axis Definitions:");
    for (i, axis) in graph.axes.iter().enumerate() {
        println!("  {:3}. {}", i, axis.fields().join(" | "));
    }
    println!();

    println!("Samples ({}):", graph.samples.len());
    for sample in graph.samples.iter() {
        println!("  {}", sample.values().join(" | "));
    }

    Ok(())
}
