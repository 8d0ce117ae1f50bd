use bigdecimal::{BigDecimal, RoundingMode, Zero as _};

use crate::error::Error;

pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

pub fn rate(value: &str) -> Result<BigDecimal, Error> {
    Ok(value.parse::<BigDecimal>()?)
}

/// Splits `total` into `parts` amounts of `total / parts` rounded half-up to
/// cents. The last part takes the remainder so the parts always sum to
/// `total`. When rounding up would leave the last part negative the shares are
/// truncated instead.
pub fn split_even(
    total: &BigDecimal,
    parts: u32,
) -> Result<Vec<BigDecimal>, Error> {
    if parts == 0 {
        return Err(Error::Validation(String::from(
            "cannot split an amount into zero parts",
        )));
    }

    let total = round_money(total);
    let exact = &total / BigDecimal::from(parts);
    let others = BigDecimal::from(parts - 1);

    let mut share = round_money(&exact);
    if &share * &others > total {
        share = exact.with_scale_round(2, RoundingMode::Down);
    }

    let mut data = vec![share; parts as usize - 1];
    let allocated = data.iter().fold(BigDecimal::zero(), |acc, v| acc + v);
    data.push(round_money(&(&total - allocated)));

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(&dec("10.005")), dec("10.01"));
        assert_eq!(round_money(&dec("10.004")), dec("10.00"));
        assert_eq!(round_money(&dec("7")).to_string(), "7.00");
    }

    #[test]
    fn test_split_even_absorbs_remainder() {
        let parts = split_even(&dec("1000.01"), 4).unwrap();
        assert_eq!(parts[..3], [dec("250.00"), dec("250.00"), dec("250.00")]);
        assert_eq!(parts[3], dec("250.01"));

        let sum = parts.iter().fold(BigDecimal::zero(), |acc, v| acc + v);
        assert_eq!(sum, dec("1000.01"));
    }

    #[test]
    fn test_split_even_never_goes_negative() {
        let parts = split_even(&dec("100.00"), 3).unwrap();
        assert_eq!(parts, vec![dec("33.33"), dec("33.33"), dec("33.34")]);

        let parts = split_even(&dec("0.02"), 4).unwrap();
        assert_eq!(parts, vec![dec("0"), dec("0"), dec("0"), dec("0.02")]);
    }

    #[test]
    fn test_split_even_rounds_shares_half_up() {
        let parts = split_even(&dec("200"), 3).unwrap();
        assert_eq!(parts[0], round_money(&(dec("200") / BigDecimal::from(3))));
        assert_eq!(parts, vec![dec("66.67"), dec("66.67"), dec("66.66")]);

        let sum = parts.iter().fold(BigDecimal::zero(), |acc, v| acc + v);
        assert_eq!(sum, dec("200"));
    }

    #[test]
    fn test_split_even_zero_parts() {
        assert!(matches!(
            split_even(&dec("10"), 0),
            Err(Error::Validation(_))
        ));
    }
}
