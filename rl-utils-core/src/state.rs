//! Numeric feature view of states

/// Trait for states that expose a flat feature vector.
///
/// Only needed when a batch of states has to be stacked into a matrix; the
/// buffer and the training loops treat states as opaque.
pub trait State {
    /// Get a feature representation of the state
    fn features(&self) -> Vec<f64>;
}

impl State for f64 {
    fn features(&self) -> Vec<f64> {
        vec![*self]
    }
}

impl State for f32 {
    fn features(&self) -> Vec<f64> {
        vec![f64::from(*self)]
    }
}

impl State for Vec<f64> {
    fn features(&self) -> Vec<f64> {
        self.clone()
    }
}

impl State for Vec<f32> {
    fn features(&self) -> Vec<f64> {
        self.iter().copied().map(f64::from).collect()
    }
}

impl<const N: usize> State for [f64; N] {
    fn features(&self) -> Vec<f64> {
        self.to_vec()
    }
}

impl<const N: usize> State for [f32; N] {
    fn features(&self) -> Vec<f64> {
        self.iter().copied().map(f64::from).collect()
    }
}

impl State for ndarray::Array1<f64> {
    fn features(&self) -> Vec<f64> {
        self.to_vec()
    }
}
