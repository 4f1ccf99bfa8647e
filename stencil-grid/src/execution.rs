//! Vertical execution order of a stage.

/// Direction a stage sweeps the vertical axis in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionOrder {
    /// From the interval's From level towards its To level.
    Forward,
    /// From the interval's To level towards its From level.
    Backward,
}

impl ExecutionOrder {
    pub fn is_backward(self) -> bool {
        matches!(self, ExecutionOrder::Backward)
    }
}
