use vernier_core::Product;

/// Community approval term.
///
/// Formula (step function over the like count):
/// `0 → 0, 1–2 → 2, 3–5 → 4, 6–10 → 6, 11–20 → 8, >20 → 10`
/// Range: 0 – 10.
///
/// Diminishing steps keep a viral listing from drowning out every other
/// signal.
pub fn calculate(product: &Product) -> i64 {
    match product.likes {
        0 => 0,
        1..=2 => 2,
        3..=5 => 4,
        6..=10 => 6,
        11..=20 => 8,
        _ => 10,
    }
}
