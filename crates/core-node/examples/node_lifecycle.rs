//! # Node Lifecycle Example
//!
//! Builds, stores, reloads and evaluates a handful of permission nodes.
//!
//! ## Run
//!
//! ```bash
//! cargo run -p core-node --example node_lifecycle
//! ```

use core_node::{MatchSettings, Node, NodeBuilder, NodeError, Query};

fn main() -> Result<(), NodeError> {
    // 1. Build nodes
    let fly = NodeBuilder::new("essentials.fly")
        .server("survival")?
        .world("nether")
        .expires_at(1_999_999_999)
        .build()?;

    let warps = NodeBuilder::new("essentials.warps.(spawn|shop)").build()?;
    let build = NodeBuilder::with_context_prefix("(region=spawn)build.*")
        .negated(true)
        .build()?;

    // 2. Encode for storage
    let stored: Vec<(String, bool)> = [&fly, &warps, &build]
        .iter()
        .map(|n| (n.to_serialized(), n.value()))
        .collect();

    for (encoded, value) in &stored {
        println!("stored: {encoded} = {value}");
    }

    // 3. Reload
    let reloaded = stored
        .iter()
        .map(|(encoded, value)| Node::from_serialized(encoded, *value))
        .collect::<Result<Vec<_>, _>>()?;

    // 4. Evaluate
    let settings = MatchSettings::default();
    let query = Query::new()
        .server("survival")
        .world("nether")
        .with_context("region", "spawn");

    for node in &reloaded {
        println!(
            "{:<50} applies: {:<5} expands to: {:?}",
            node.to_serialized(),
            node.applies_to(&query, &settings),
            node.expand_with(&settings)?
        );
    }

    let known = vec!["build.place".to_string(), "build.break".to_string(), "chat.color".to_string()];
    println!("build.* resolves to {:?}", build.resolve_wildcard(Some(&known[..])));

    Ok(())
}
