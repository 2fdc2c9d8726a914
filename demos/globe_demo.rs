//! Complete workflow demonstration for globe_network

use globe_network::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== globe_network Complete Demo ===\n");

    // Step 1: Configure globe
    println!("Step 1: Configuring globe...");
    let config = GlobeConfigBuilder::new()
        .node_count(24)
        .radius(5.0)?
        .names(["London", "New York", "Tokyo", "Sydney", "Nairobi", "Sao Paulo"])
        .angle_threshold(DEFAULT_ANGLE_THRESHOLD_DEGREES)?
        .build()?;

    println!("  Nodes: {}", config.node_count);
    println!("  Radius: {}", config.radius);
    println!("  Angle threshold: {} deg", config.angle_threshold_degrees);

    // Step 2: Generate network
    println!("\nStep 2: Generating network...");
    let globe = NetworkGlobe::generate(config)?;
    println!("  Generated {} nodes, {} links", globe.node_count(), globe.edges().len());

    // Step 3: Degree distribution
    println!("\nStep 3: Degree distribution:");
    let mut degrees = std::collections::BTreeMap::new();
    for node in globe.nodes() {
        *degrees.entry(globe.get_neighbors(node.id()).len()).or_insert(0usize) += 1;
    }
    for (degree, count) in &degrees {
        println!("  degree {}: {} nodes", degree, count);
    }

    // Step 4: Pick a node by position
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 4: Spatial queries:");
        let probe = Vec3::new(globe.radius(), 0.0, 0.0);
        if let Some(id) = globe.find_node_at(probe) {
            let node = globe.get_node(id).expect("handle from this generation");
            println!("  Position {:?} -> {} at {:?}", probe, node.name(), node.position());
        }
    }

    // Step 5: Route between two cities
    println!("\nStep 5: Routing London -> Sydney...");
    let path = globe.find_path_by_name("London", "Sydney")?;
    if path.is_found() {
        let names: Vec<&str> = path
            .nodes()
            .iter()
            .filter_map(|&id| globe.get_node(id).map(Node::name))
            .collect();
        println!("  {}", names.join(" -> "));
        println!("  {} hops, length {:.3}", path.hop_count(), path.total_distance());
    } else {
        println!("  no route between London and Sydney");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
