use vernier_core::Product;

/// Visibility term.
///
/// Formula (step function over the view count):
/// `0 → 0, 1–10 → 1, 11–50 → 2, 51–100 → 3, 101–500 → 4, >500 → 5`
/// Range: 0 – 5.
///
/// Views are a weaker signal than likes; a widely seen listing that nobody
/// endorses earns at most half the likes ceiling.
pub fn calculate(product: &Product) -> i64 {
    match product.views {
        0 => 0,
        1..=10 => 1,
        11..=50 => 2,
        51..=100 => 3,
        101..=500 => 4,
        _ => 5,
    }
}
