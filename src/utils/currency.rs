/// Currency utility functions for rupee/paise conversions.
///
/// The payment gateway bills in paise (1 Rupee = 100 paise); job amounts
/// are stored as decimal rupees.

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

/// Convert a rupee amount to integer paise for gateway order creation.
pub fn rupees_to_paise(rupees: &BigDecimal) -> i64 {
    (rupees * BigDecimal::from(100))
        .round(0)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn whole_rupees_convert_exactly() {
        assert_eq!(rupees_to_paise(&BigDecimal::from(350)), 35000);
    }

    #[test]
    fn fractional_rupees_round_to_nearest_paisa() {
        assert_eq!(
            rupees_to_paise(&BigDecimal::from_str("299.995").unwrap()),
            30000
        );
        assert_eq!(
            rupees_to_paise(&BigDecimal::from_str("120.50").unwrap()),
            12050
        );
    }

}
