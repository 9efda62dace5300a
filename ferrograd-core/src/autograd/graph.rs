use std::collections::HashSet;
use std::sync::RwLock;

use crate::error::FerrogradError;
use crate::tensor_data::TensorData;

/// Stable identity of a node in the recorded computation graph.
///
/// A raw pointer to the shared `TensorData` lock gives a stable key even as
/// `Tensor` handles are cloned or dropped. Validity relies on the backward
/// structs holding strong handles to their inputs, so every reachable node
/// outlives the graph walk (see [`BackwardOp`](super::BackwardOp)).
pub type NodeId = *const RwLock<TensorData>;

/// Builds a topological ordering of the computation graph reachable from
/// `root`, leaves first. `backward()` consumes it in reverse.
pub(crate) fn topological_sort(root: NodeId) -> Result<Vec<NodeId>, FerrogradError> {
    enum Visit {
        Enter(NodeId),
        Exit(NodeId),
    }

    let mut sorted = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![Visit::Enter(root)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node_id) => {
                if visited.contains(&node_id) {
                    continue;
                }
                visited.insert(node_id);
                stack.push(Visit::Exit(node_id));

                // SAFETY: every NodeId reachable from the root is kept alive
                // by the strong input handles stored in the backward structs.
                let guard = unsafe { &*node_id }.read().map_err(|_| {
                    FerrogradError::BackwardError(
                        "failed to acquire read lock during graph traversal".to_string(),
                    )
                })?;
                if let Some(grad_fn) = guard.grad_fn.as_ref() {
                    for input_id in grad_fn.inputs() {
                        if !visited.contains(&input_id) {
                            stack.push(Visit::Enter(input_id));
                        }
                    }
                }
            }
            Visit::Exit(node_id) => sorted.push(node_id),
        }
    }

    Ok(sorted)
}
