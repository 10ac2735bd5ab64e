// 🌱 Eco Tips - Static sustainability tips shown by the shell
// No state, no I/O - just the catalog.

/// The five sustainable-budgeting tips, in display order.
pub const ECO_TIPS: [&str; 5] = [
    "Buy locally-produced goods.",
    "Use reusable bags and bottles.",
    "Opt for energy-efficient appliances.",
    "Avoid single-use plastics.",
    "Shop second-hand when possible.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_five_nonempty_tips() {
        assert_eq!(ECO_TIPS.len(), 5);
        for tip in ECO_TIPS {
            assert!(!tip.is_empty());
        }
    }
}
