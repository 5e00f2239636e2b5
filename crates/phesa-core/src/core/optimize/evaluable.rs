/// A differentiable scalar function of a flat state vector.
///
/// Optimizers move the state only through [`Evaluable::set_state`] and read
/// the value and gradient at the current state through
/// [`Evaluable::fg_value`].
pub trait Evaluable {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Copies the current state into `buffer`, which has length [`Evaluable::dimension`].
    fn state_into(&self, buffer: &mut [f64]);

    fn state(&self) -> Vec<f64> {
        let mut buffer = vec![0.0; self.dimension()];
        self.state_into(&mut buffer);
        buffer
    }

    fn set_state(&mut self, state: &[f64]);

    /// Value at the current state; fills `gradient` with its partial derivatives.
    fn fg_value(&self, gradient: &mut [f64]) -> f64;
}
