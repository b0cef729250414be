/// Example: Print the goal scene hierarchy without opening the renderer
///
/// Usage: cargo run --example scene_tree -- [support-angle-degrees]
use std::env;

use anyhow::{Context, Result};
use goal3d_core::{GoalConfig, GoalScene, NodeId, SceneGraph};

fn print_node(graph: &SceneGraph, id: NodeId, depth: usize) {
    let node = graph.node(id);
    let origin = graph.world_transform(id).column(3).xyz();
    let triangles = node
        .mesh
        .as_ref()
        .map(|m| format!(" {} ({} tris)", m.primitive.kind(), m.mesh.triangle_count()))
        .unwrap_or_default();
    println!(
        "{:indent$}{}{} @ ({:.3}, {:.3}, {:.3})",
        "",
        node.name,
        triangles,
        origin.x,
        origin.y,
        origin.z,
        indent = depth * 2
    );
    for child in graph.children(id) {
        print_node(graph, *child, depth + 1);
    }
}

fn main() -> Result<()> {
    let mut config = GoalConfig::default();
    if let Some(angle) = env::args().nth(1) {
        config.dimensions.support_angle_degrees = angle
            .parse()
            .with_context(|| format!("not an angle: {}", angle))?;
    }

    let scene = GoalScene::build(config).context("failed to build the goal scene")?;
    print_node(&scene.graph, scene.graph.root(), 0);
    println!(
        "\n{} nodes, {} meshes, {} triangles",
        scene.graph.len(),
        scene.graph.mesh_count(),
        scene.graph.triangle_count()
    );
    Ok(())
}
