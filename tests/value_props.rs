//! Property tests for the value types: amounts, price bounds, strkey.

use proptest::prelude::*;

use pi_bootstrap::amount::Amount;
use pi_bootstrap::crypto::{decode_account_id, decode_secret_seed, encode_account_id, encode_secret_seed};
use pi_bootstrap::pool::{Price, PriceBound};

proptest! {
    #[test]
    fn amount_display_parse_round_trips(stroops in 0i64..=i64::MAX) {
        let amount = Amount::from_stroops(stroops);
        let parsed = Amount::parse(&amount.to_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    #[test]
    fn amount_parse_accepts_up_to_seven_decimals(
        whole in 0u64..1_000_000_000u64,
        frac in 0u32..10_000_000u32,
    ) {
        let text = format!("{}.{:07}", whole, frac);
        let amount = Amount::parse(&text).unwrap();
        prop_assert_eq!(
            amount.stroops(),
            whole as i64 * 10_000_000 + frac as i64
        );
    }

    #[test]
    fn amount_ordering_matches_stroop_ordering(a in 0i64..=i64::MAX, b in 0i64..=i64::MAX) {
        let (x, y) = (Amount::from_stroops(a), Amount::from_stroops(b));
        prop_assert_eq!(x < y, a < b);
    }

    #[test]
    fn price_bound_accepts_exactly_ordered_pairs(
        min_n in 1i32..10_000, min_d in 1i32..10_000,
        max_n in 1i32..10_000, max_d in 1i32..10_000,
    ) {
        let min = Price::new(min_n, min_d).unwrap();
        let max = Price::new(max_n, max_d).unwrap();
        let ordered = (min_n as i64) * (max_d as i64) <= (max_n as i64) * (min_d as i64);
        prop_assert_eq!(PriceBound::new(min, max).is_ok(), ordered);
    }

    #[test]
    fn strkey_round_trips_any_key(bytes in prop::array::uniform32(any::<u8>())) {
        let account = encode_account_id(&bytes);
        prop_assert!(account.starts_with('G'));
        prop_assert_eq!(decode_account_id(&account).unwrap(), bytes);

        let seed = encode_secret_seed(&bytes);
        prop_assert!(seed.starts_with('S'));
        prop_assert_eq!(decode_secret_seed(&seed).unwrap(), bytes);
    }
}
