use super::math::argmax;
use crate::graph::ArcGraph;
use rayon::prelude::*;

/// Returns the node maximizing the product of its indegree and outdegree, or
/// [`None`] if the graph has no nodes.
///
/// In case of ties, the smallest node is returned.
pub fn max_degree_product_node(graph: &ArcGraph) -> Option<usize> {
    let products: Vec<usize> = (0..graph.num_nodes())
        .into_par_iter()
        .map(|node| graph.indegree(node).saturating_mul(graph.outdegree(node)))
        .collect();
    argmax(&products)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_max_degree_product() {
        // Node 1 has in/out 2/2, node 2 has in/out 1/3.
        let graph = ArcGraph::from_arcs(
            0,
            [(0, 1), (2, 1), (1, 0), (1, 3), (2, 0), (2, 3), (3, 2)],
        );
        assert_eq!(max_degree_product_node(&graph), Some(1));
        assert_eq!(max_degree_product_node(&ArcGraph::from_arcs(0, [])), None);
    }
}
