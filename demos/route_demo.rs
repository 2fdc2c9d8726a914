//! Regenerating a network and re-running a route query

use globe_network::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .init();

    let mut globe = NetworkGlobe::generate(GlobeConfig::default())?;
    let start = globe.nodes()[0].id();
    let end = globe.nodes()[globe.node_count() - 1].id();

    let path = globe.find_path(start, end)?;
    println!("generation {}: {} nodes on route", globe.generation(), path.len());
    for position in globe.path_positions(&path)? {
        println!("  {:>7.3} {:>7.3} {:>7.3}", position.x, position.y, position.z);
    }

    // Sparser, jittered mesh
    let config = GlobeConfigBuilder::new()
        .node_count(40)
        .jitter(0.3)?
        .seed(7)
        .angle_threshold(30.0)?
        .build()?;
    globe.regenerate(config)?;

    // Handles from the previous generation no longer resolve
    match globe.find_path(start, end) {
        Ok(_) => println!("stale handles unexpectedly resolved"),
        Err(err) => println!("generation {}: {}", globe.generation(), err),
    }

    let path = globe.find_path_by_name("Node0", "Node39")?;
    if path.is_found() {
        println!("generation {}: {} hops", globe.generation(), path.hop_count());
    } else {
        println!("generation {}: Node0 and Node39 are not connected", globe.generation());
    }

    Ok(())
}
