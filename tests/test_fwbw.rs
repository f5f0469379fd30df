use anyhow::Result;
use dsi_progress_logger::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use webgraph::prelude::VecGraph;
use webgraph_dagpart::algo::fwbw::forward_backward;
use webgraph_dagpart::prelude::*;
use webgraph_dagpart::threads;

/// Nodes reachable from `start` following arcs (or against them, if
/// `transpose` is true).
fn reachable(graph: &ArcGraph, start: usize, transpose: bool) -> Vec<bool> {
    let mut seen = vec![false; graph.num_nodes()];
    let mut stack = vec![start];
    seen[start] = true;
    while let Some(node) = stack.pop() {
        let next: Vec<usize> = if transpose {
            graph.predecessors(node).collect()
        } else {
            graph.successors(node).to_vec()
        };
        for succ in next {
            if !seen[succ] {
                seen[succ] = true;
                stack.push(succ);
            }
        }
    }
    seen
}

#[test]
fn test_upstream_cycle_downstream() -> Result<()> {
    let graph = ArcGraph::from_graph(&VecGraph::from_arcs([
        (4, 5),
        (5, 6),
        (6, 0),
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (2, 7),
        (7, 8),
        (8, 9),
    ]));
    let reach = forward_backward(&graph, 0, 1000, &threads![], no_logging![])?;

    let confirmed = (0..10).filter(|&n| reach.is_confirmed(n)).collect::<Vec<_>>();
    let reconfirmed = (0..10).filter(|&n| reach.is_reconfirmed(n)).collect::<Vec<_>>();
    assert_eq!(confirmed, vec![0, 1, 2, 3, 7, 8, 9]);
    assert_eq!(reconfirmed, vec![0, 1, 2, 3]);
    assert_eq!(reach.pivot(), 0);
    assert!(reach.forward.is_fixpoint());
    assert!(reach.backward.is_fixpoint());
    assert_eq!(reach.color(8), Some(0));
    assert_eq!(reach.color(4), None);
    Ok(())
}

#[test]
fn test_loops_are_ignored() -> Result<()> {
    let graph = ArcGraph::from_arcs(0, [(0, 0), (0, 1), (1, 1), (2, 2), (2, 0)]);
    let reach = forward_backward(&graph, 0, 1000, &threads![], no_logging![])?;

    assert!(reach.is_reconfirmed(0));
    assert!(reach.is_confirmed(1));
    assert!(!reach.is_reconfirmed(1));
    assert!(!reach.is_confirmed(2));
    Ok(())
}

#[test]
fn test_random_graphs() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(0);
    for num_nodes in [10, 50, 200] {
        for density in [1, 2, 4] {
            let arcs = (0..num_nodes * density)
                .map(|_| (rng.random_range(0..num_nodes), rng.random_range(0..num_nodes)))
                .collect::<Vec<_>>();
            let graph = ArcGraph::from_arcs(num_nodes, arcs);
            let pivot = rng.random_range(0..num_nodes);

            let reach = forward_backward(&graph, pivot, 1000, &threads![], no_logging![])?;
            let forward = reachable(&graph, pivot, false);
            let backward = reachable(&graph, pivot, true);
            for node in 0..num_nodes {
                assert_eq!(reach.is_confirmed(node), forward[node], "node {}", node);
                assert_eq!(
                    reach.is_reconfirmed(node),
                    forward[node] && backward[node],
                    "node {}",
                    node
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_budget_exhausted() -> Result<()> {
    let graph = ArcGraph::from_arcs(0, (0..9).map(|node| (node, node + 1)));
    let reach = forward_backward(&graph, 0, 3, &threads![], no_logging![])?;

    assert_eq!(reach.forward, Convergence::BudgetExhausted { rounds: 3 });
    assert!(reach.is_confirmed(3));
    assert!(!reach.is_confirmed(4));
    assert_eq!(reach.backward, Convergence::Fixpoint { rounds: 0 });
    Ok(())
}

#[test]
fn test_pivot_out_of_range() {
    let graph = ArcGraph::from_arcs(0, [(0, 1)]);
    let result = forward_backward(&graph, 2, 10, &threads![], no_logging![]);
    assert!(matches!(
        result,
        Err(webgraph_dagpart::Error::DegenerateConfig { .. })
    ));
}
