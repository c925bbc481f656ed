use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const RUB_CURRENCY_CODE: &str = "RUB";
pub const RUB_CURRENCY_CODE_LOWER: &str = "rub";

//--------------------------------------      Rubles       -----------------------------------------------------------
/// A ruble amount, stored as an integer number of kopeks.
///
/// The payment provider exchanges amounts as strings with exactly two decimal places ("1500.00"), so the amount is
/// kept in its smallest unit and only rendered to the wire format via [`Rubles::to_out_sum`].
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Rubles(i64);

op!(binary Rubles, Add, add);
op!(binary Rubles, Sub, sub);
op!(inplace Rubles, SubAssign, sub_assign);
op!(unary Rubles, Neg, neg);

impl Mul<i64> for Rubles {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Sum for Rubles {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in rubles: {0}")]
pub struct RublesConversionError(String);

impl From<i64> for Rubles {
    fn from(kopeks: i64) -> Self {
        Self(kopeks)
    }
}

impl PartialEq for Rubles {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Rubles {}

impl Rubles {
    /// The amount in kopeks.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_rubles(rubles: i64) -> Self {
        Self(rubles * 100)
    }

    pub fn from_kopeks(kopeks: i64) -> Self {
        Self(kopeks)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Renders the amount in the provider's fixed two-decimal wire format, e.g. `1500.00`.
    pub fn to_out_sum(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let kopeks = self.0.abs();
        format!("{sign}{}.{:02}", kopeks / 100, kopeks % 100)
    }
}

impl Display for Rubles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ₽", self.to_out_sum())
    }
}

impl FromStr for Rubles {
    type Err = RublesConversionError;

    /// Parses amounts as the provider sends them: `1500`, `1500.00` and `1500.5` are all accepted. More than two
    /// decimal digits, or anything non-numeric, is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(RublesConversionError(s.to_string()));
        }
        let rubles = whole.parse::<i64>().map_err(|_| RublesConversionError(s.to_string()))?;
        let kopeks = match frac {
            "" => 0,
            f if f.chars().all(|c| c.is_ascii_digit()) => {
                let mut v = f.parse::<i64>().map_err(|_| RublesConversionError(s.to_string()))?;
                if f.len() == 1 {
                    v *= 10;
                }
                v
            },
            _ => return Err(RublesConversionError(s.to_string())),
        };
        let signum = if whole.starts_with('-') { -1 } else { 1 };
        Ok(Self(rubles * 100 + signum * kopeks))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kopek_arithmetic() {
        let a = Rubles::from_rubles(1500);
        let b = Rubles::from_kopeks(50);
        assert_eq!((a + b).value(), 150_050);
        assert_eq!((a - b).value(), 149_950);
        assert_eq!((-b).value(), -50);
        assert_eq!((b * 3).value(), 150);
        let total: Rubles = [a, b, b].into_iter().sum();
        assert_eq!(total.value(), 150_100);
    }

    #[test]
    fn out_sum_format() {
        assert_eq!(Rubles::from_rubles(1500).to_out_sum(), "1500.00");
        assert_eq!(Rubles::from_kopeks(150_050).to_out_sum(), "1500.50");
        assert_eq!(Rubles::from_kopeks(5).to_out_sum(), "0.05");
        assert_eq!(Rubles::from_kopeks(-105).to_out_sum(), "-1.05");
    }

    #[test]
    fn parses_wire_amounts() {
        assert_eq!("1500".parse::<Rubles>().unwrap(), Rubles::from_rubles(1500));
        assert_eq!("1500.00".parse::<Rubles>().unwrap(), Rubles::from_rubles(1500));
        assert_eq!("1500.5".parse::<Rubles>().unwrap(), Rubles::from_kopeks(150_050));
        assert_eq!("0.05".parse::<Rubles>().unwrap(), Rubles::from_kopeks(5));
        assert!("1500.005".parse::<Rubles>().is_err());
        assert!("".parse::<Rubles>().is_err());
        assert!("15,00".parse::<Rubles>().is_err());
        assert!("abc".parse::<Rubles>().is_err());
    }

    #[test]
    fn display_includes_currency() {
        assert_eq!(Rubles::from_rubles(300).to_string(), "300.00 ₽");
    }
}
