//! The node arena.
//!
//! The parameter space owns all nodes in a single flat `Vec`, indexed by the
//! row-major flattening of the axis sample indices (first axis slowest,
//! ascending within an axis). That order is fixed at construction time and is
//! the order the result collector emits rows in, independent of how the
//! search engine schedules evaluations.

use crate::domain::{Misfit, Parameter};
use crate::error::AppError;
use crate::space::Axis;

/// One point of the grid: an immutable coordinate tuple plus a result slot.
///
/// `result` is `None` until the node has been visited; the engine writes it
/// exactly once.
#[derive(Debug, Clone)]
pub struct Node {
    coords: Vec<f64>,
    result: Option<Misfit>,
}

impl Node {
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn result(&self) -> Option<&Misfit> {
        self.result.as_ref()
    }

    pub fn is_computed(&self) -> bool {
        self.result.is_some()
    }

    pub(crate) fn set_result(&mut self, misfit: Misfit) {
        self.result = Some(misfit);
    }
}

/// The full Cartesian product of axis samples.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    axes: Vec<Axis>,
    nodes: Vec<Node>,
}

impl ParameterSpace {
    /// Materialize the grid for an ordered parameter list.
    ///
    /// Zero parameters yield exactly one node with an empty coordinate tuple.
    pub fn build(parameters: &[Parameter]) -> Result<Self, AppError> {
        let axes: Vec<Axis> = parameters
            .iter()
            .map(Axis::from_parameter)
            .collect::<Result<_, _>>()?;

        let mut total: usize = 1;
        for axis in &axes {
            total = total.checked_mul(axis.samples.len()).ok_or_else(|| {
                AppError::semantic("Grid is too large: node count overflows usize.")
            })?;
        }

        let mut nodes = Vec::with_capacity(total);
        for index in 0..total {
            nodes.push(Node {
                coords: coords_for_index(&axes, index),
                result: None,
            });
        }

        Ok(Self { axes, nodes })
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Position of the axis with the given parameter id.
    pub fn axis_index(&self, id: &str) -> Option<usize> {
        self.axes.iter().position(|axis| axis.id == id)
    }

    /// Nodes in the deterministic forward iteration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether every node carries a computed result.
    pub fn is_fully_computed(&self) -> bool {
        self.nodes.iter().all(Node::is_computed)
    }
}

/// Map a flat node index to its coordinate tuple (row-major, first axis
/// slowest).
fn coords_for_index(axes: &[Axis], index: usize) -> Vec<f64> {
    let mut coords = vec![0.0; axes.len()];
    let mut rest = index;
    for (dim, axis) in axes.iter().enumerate().rev() {
        let n = axis.samples.len();
        coords[dim] = axis.samples[rest % n];
        rest /= n;
    }
    coords
}
