//! Label traits the ordering phase is generic over.

/// Which neighbors a layer graph looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Predecessors in `rank - 1`; used when sweeping down from an already ordered rank above.
    InEdges,
    /// Successors in `rank + 1`; used when sweeping up.
    OutEdges,
}

impl Relationship {
    /// The rank whose nodes act as the fixed positional signal for `rank`.
    pub fn adjacent_rank(self, rank: i32) -> i32 {
        match self {
            Relationship::InEdges => rank - 1,
            Relationship::OutEdges => rank + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightLabel {
    pub weight: f64,
}

impl Default for WeightLabel {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

pub trait OrderEdge {
    fn weight(&self) -> f64;
}

impl OrderEdge for WeightLabel {
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl OrderEdge for crate::EdgeLabel {
    fn weight(&self) -> f64 {
        self.weight
    }
}

pub trait OrderNode {
    fn rank(&self) -> Option<i32>;
    fn order(&self) -> Option<usize>;
    fn set_order(&mut self, order: usize);

    fn border_left_at(&self, _rank: i32) -> Option<&str> {
        None
    }

    fn border_right_at(&self, _rank: i32) -> Option<&str> {
        None
    }
}

impl OrderNode for crate::NodeLabel {
    fn rank(&self) -> Option<i32> {
        self.rank
    }

    fn order(&self) -> Option<usize> {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = Some(order);
    }

    fn border_left_at(&self, rank: i32) -> Option<&str> {
        let ix = usize::try_from(rank).ok()?;
        self.border_left.get(ix)?.as_deref()
    }

    fn border_right_at(&self, rank: i32) -> Option<&str> {
        let ix = usize::try_from(rank).ok()?;
        self.border_right.get(ix)?.as_deref()
    }
}
