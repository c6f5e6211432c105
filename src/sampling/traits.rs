//! Traits for path sampling.

/// Trait for a one-dimensional potential V(x) entering the action.
pub trait Potential {
    fn value(&self, x: f64) -> f64;
}

/// Harmonic oscillator potential V(x) = x²/2 (unit mass and frequency).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HarmonicPotential;

impl Potential for HarmonicPotential {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        0.5 * x * x
    }
}

/// Closures are potentials too, which keeps tests short.
impl<F: Fn(f64) -> f64> Potential for F {
    #[inline]
    fn value(&self, x: f64) -> f64 {
        self(x)
    }
}
