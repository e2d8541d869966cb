use proptest::prelude::*;

use surety_types::{AccountId, Amount, FlightKey, FlightStatus, ProtocolParams, Timestamp};

proptest! {
    /// Airline quorum is a majority, rounded up, of any registered count.
    #[test]
    fn airline_quorum_is_ceil_half(registered in 1u32..10_000) {
        let quorum = ProtocolParams::airline_quorum(registered);
        prop_assert!(quorum * 2 >= registered);
        prop_assert!((quorum - 1) * 2 < registered);
    }

    /// Scaling by the payout multiplier never loses more than one raw unit.
    #[test]
    fn payout_scaling_is_exact_enough(premium in 0u128..1_000_000_000_000, bps in 1u32..50_000) {
        let scaled = Amount::new(premium).checked_mul_bps(bps).unwrap();
        let exact_times_denominator = premium * u128::from(bps);
        prop_assert!(scaled.raw() * 10_000 <= exact_times_denominator);
        prop_assert!(exact_times_denominator - scaled.raw() * 10_000 < 10_000);
    }

    /// Status codes survive the wire encoding.
    #[test]
    fn status_code_roundtrip(idx in 0usize..6) {
        let status = FlightStatus::ALL[idx];
        prop_assert_eq!(FlightStatus::from_code(status.code()), Some(status));
    }

    /// Distinct flight keys have distinct digests.
    #[test]
    fn flight_digest_distinguishes_codes(a in "[A-Z]{2}[0-9]{1,4}", b in "[A-Z]{2}[0-9]{1,4}", ts in 0u64..u64::MAX) {
        let airline = AccountId::new("airline");
        let ka = FlightKey::new(airline.clone(), a.clone(), Timestamp::new(ts));
        let kb = FlightKey::new(airline, b.clone(), Timestamp::new(ts));
        prop_assert_eq!(ka.digest() == kb.digest(), a == b);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(base in 0u64..1_000_000, duration in 0u64..1_000_000, offset in 0u64..2_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.has_expired(duration, now), offset >= duration);
    }
}
