//! Rate-constant kinetics for the binding state machine.
//!
//! Binding and unbinding are modelled as Poisson processes. For a rate constant `k` and a
//! timestep `dt`, the waiting time is exponentially distributed, so the probability that the
//! event fires within one step is `1 - exp(-k * dt)`. This keeps `k_on` and `k_off` meaningful
//! as rates regardless of the chosen timestep; the linear approximation `k * dt` is not used.

/// Probability that an event with rate `rate` occurs within a step of length `dt`.
///
/// Both arguments are expected to be non-negative; the result lies in `[0, 1]`.
pub fn event_probability(rate: f64, dt: f64) -> f64 {
    -(-rate * dt).exp_m1()
}

/// Equilibrium fraction of occupied sites for a single ligand species, `k_on / (k_on + k_off)`.
///
/// This is the pseudo-first-order limit and ignores diffusion; it is a reference value for
/// comparing the recorded occupancy against, not a prediction of it.
pub fn equilibrium_occupancy(k_on: f64, k_off: f64) -> Option<f64> {
    let total = k_on + k_off;
    (total > 0.0).then(|| k_on / total)
}
