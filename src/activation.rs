//! Activation function.
//!
//! Every non-input neuron computes a net input `z = b + sum(w * a)` and then
//! applies the logistic sigmoid: `a = sigmoid(z)`.
//!
//! The network caches post-activation values, so backprop derives the slope
//! from the activation itself: `sigmoid'(z) = a * (1 - a)`. No separate
//! net-input lookup is needed during the backward pass.

/// Logistic sigmoid, `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    // Numerically stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Derivative of the sigmoid with respect to its net input `x`.
#[inline]
pub fn sigmoid_derivative(x: f64) -> f64 {
    sigmoid_derivative_from_activation(sigmoid(x))
}

/// Derivative of the sigmoid expressed in terms of its output `a = sigmoid(z)`.
#[inline]
pub fn sigmoid_derivative_from_activation(activation: f64) -> f64 {
    activation * (1.0 - activation)
}
