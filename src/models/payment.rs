use std::fmt;

use time::Date;

use crate::error::{AppError, AppResult};

/// Card networks EagleView accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardBrand {
    AmericanExpress,
    Visa,
    MasterCard,
    Discover,
}

impl CardBrand {
    pub fn detect(digits: &str) -> Option<Self> {
        let len = digits.len();
        let prefix = |n: usize| -> u32 { digits.get(..n).and_then(|p| p.parse().ok()).unwrap_or(0) };

        if (prefix(2) == 34 || prefix(2) == 37) && len == 15 {
            return Some(CardBrand::AmericanExpress);
        }
        if digits.starts_with('4') && matches!(len, 13 | 16 | 19) {
            return Some(CardBrand::Visa);
        }
        if len == 16 && ((51..=55).contains(&prefix(2)) || (2221..=2720).contains(&prefix(4))) {
            return Some(CardBrand::MasterCard);
        }
        if (16..=19).contains(&len)
            && (prefix(4) == 6011
                || prefix(2) == 65
                || (644..=649).contains(&prefix(3))
                || (622126..=622925).contains(&prefix(6)))
        {
            return Some(CardBrand::Discover);
        }
        None
    }

    /// `CreditCardType` value in EagleView order payloads.
    pub fn eagleview_code(self) -> i32 {
        match self {
            CardBrand::AmericanExpress => 1,
            CardBrand::Visa => 2,
            CardBrand::MasterCard => 3,
            CardBrand::Discover => 4,
        }
    }
}

pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

#[derive(Clone)]
pub struct PaymentCard {
    number: String,
    pub brand: CardBrand,
    pub expire_month: u8,
    pub expire_year: i32,
}

impl PaymentCard {
    /// Validates raw form input. `today` bounds the expiration date.
    pub fn parse(number: &str, month: &str, year: &str, today: Date) -> AppResult<Self> {
        let digits: String = number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        if digits.is_empty() {
            return Err(AppError::Validation("card number is required".into()));
        }
        if !luhn_valid(&digits) {
            return Err(AppError::Validation("card number is not valid".into()));
        }
        let brand = CardBrand::detect(&digits).ok_or_else(|| {
            AppError::Validation("this card type is not supported by EagleView".into())
        })?;

        let expire_month: u8 = month
            .trim()
            .parse()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| AppError::Validation("expiration month must be 1-12".into()))?;

        let expire_year: i32 = match year.trim().parse::<i32>() {
            Ok(y) if (0..100).contains(&y) => 2000 + y,
            Ok(y) if (2000..=2099).contains(&y) => y,
            _ => {
                return Err(AppError::Validation(
                    "expiration year must be YY or YYYY".into(),
                ));
            }
        };

        if (expire_year, expire_month) < (today.year(), u8::from(today.month())) {
            return Err(AppError::Validation("card has expired".into()));
        }

        Ok(Self {
            number: digits,
            brand,
            expire_month,
            expire_year,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn last_four(&self) -> &str {
        &self.number[self.number.len().saturating_sub(4)..]
    }
}

impl fmt::Debug for PaymentCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCard")
            .field("brand", &self.brand)
            .field("last_four", &self.last_four())
            .field("expire_month", &self.expire_month)
            .field("expire_year", &self.expire_year)
            .finish()
    }
}
