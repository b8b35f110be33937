//! Property tests for resource graph ordering.

use proptest::prelude::*;

use edgesite::domain::services::{GraphError, ResourceGraph};

/// Node count, priorities and forward edges (`from > to`), so the graph is acyclic
fn dag() -> impl Strategy<Value = (Vec<u8>, Vec<(usize, usize)>)> {
    (1usize..=12).prop_flat_map(|n| {
        let priorities = proptest::collection::vec(0u8..4, n);
        let edges = proptest::collection::vec((0..n, 0..n), 0..=n * 2).prop_map(|pairs| {
            pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| if a > b { (a, b) } else { (b, a) })
                .collect::<Vec<_>>()
        });
        (priorities, edges)
    })
}

fn build(priorities: &[u8], edges: &[(usize, usize)]) -> ResourceGraph<usize> {
    let mut graph = ResourceGraph::new();
    for (id, priority) in priorities.iter().enumerate() {
        graph.add_node(id, *priority).unwrap();
    }
    for (node, dep) in edges {
        graph.add_dependency(node, dep).unwrap();
    }
    graph
}

fn position(order: &[usize], id: usize) -> usize {
    order.iter().position(|n| *n == id).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Every dependency is ordered before the node that needs it.
    #[test]
    fn property_dependencies_come_first((priorities, edges) in dag()) {
        let graph = build(&priorities, &edges);
        let order = graph.topological_order().unwrap();

        prop_assert_eq!(order.len(), priorities.len());
        for (node, dep) in &edges {
            prop_assert!(position(&order, *dep) < position(&order, *node));
        }
    }

    /// PROPERTY: Teardown order is exactly the apply order reversed.
    #[test]
    fn property_reverse_order_mirrors_topological((priorities, edges) in dag()) {
        let graph = build(&priorities, &edges);
        let mut forward = graph.topological_order().unwrap();
        forward.reverse();

        prop_assert_eq!(graph.reverse_order().unwrap(), forward);
    }

    /// PROPERTY: Ordering is deterministic for the same graph.
    #[test]
    fn property_order_is_stable((priorities, edges) in dag()) {
        let first = build(&priorities, &edges).topological_order().unwrap();
        let second = build(&priorities, &edges).topological_order().unwrap();
        prop_assert_eq!(first, second);
    }

    /// PROPERTY: Transitive dependents are exactly the nodes reachable backwards.
    #[test]
    fn property_transitive_dependents_follow_edges((priorities, edges) in dag(), pick in 0usize..12) {
        let graph = build(&priorities, &edges);
        let root = pick % priorities.len();
        let dependents = graph.transitive_dependents(&root);

        prop_assert!(!dependents.contains(&root));
        for direct in graph.dependents_of(&root) {
            prop_assert!(dependents.contains(&direct));
        }
        let order = graph.topological_order().unwrap();
        for dependent in &dependents {
            prop_assert!(position(&order, root) < position(&order, *dependent));
        }
    }

    /// PROPERTY: Closing a path into a loop is always reported as a cycle.
    #[test]
    fn property_back_edge_is_a_cycle(len in 2usize..8) {
        let mut graph = ResourceGraph::new();
        for id in 0..len {
            graph.add_node(id, 0).unwrap();
        }
        for id in 1..len {
            graph.add_dependency(&id, &(id - 1)).unwrap();
        }
        graph.add_dependency(&0, &(len - 1)).unwrap();

        let is_cycle = matches!(graph.topological_order(), Err(GraphError::Cycle(_)));
        prop_assert!(is_cycle);
    }
}
