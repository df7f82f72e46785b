pub mod forward;
pub mod selector;
pub mod temporal;
pub mod variance;

/// Small helpers shared by the term models
pub mod utils {
    use std::cmp::Ordering;

    /// Total order on strikes for sorting; incomparable values compare equal.
    pub fn strike_cmp(a: f64, b: f64) -> Ordering {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}
