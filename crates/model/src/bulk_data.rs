use std::borrow::Cow;

use num_rational::Ratio;

use rand::distr::{Alphanumeric, Distribution, SampleString};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::{Field, Row};

/// User address
#[derive(Debug, Clone, PartialEq)]
pub struct UserAddr(String);

impl UserAddr {
    const ADDRESS_LENGTH: usize = 26;

    fn new_random(rng: &mut impl Rng) -> Self {
        let sample = Alphanumeric.sample_string(rng, Self::ADDRESS_LENGTH);
        UserAddr(sample)
    }
}

/// Transaction timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp(i64);

impl Timestamp {
    const BOUNDARY: i64 = 1742817035;

    fn new_random(rng: &mut impl Rng) -> Self {
        Timestamp(rng.random_range(0..Self::BOUNDARY))
    }
}

/// Transaction hash
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionId(String);

impl TransactionId {
    const ID_LENGTH: usize = 64;

    fn new_random(rng: &mut impl Rng) -> Self {
        let sample = Hexadecimal.sample_string(rng, Self::ID_LENGTH);
        TransactionId(sample)
    }
}

/// One synthetic row. The timestamp leads so that the default sort column
/// is numeric and mostly unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction(Timestamp, UserAddr, TransactionId);

impl Transaction {
    pub fn serialize_csv<W>(&self, writer: &mut csv::Writer<W>) -> anyhow::Result<()>
    where
        W: std::io::Write,
    {
        writer.write_field(self.0.0.to_string())?;
        writer.write_field(&self.1.0)?;
        writer.write_field(&self.2.0)?;
        writer.write_record(None::<&[u8]>)?;
        Ok(())
    }

    pub fn into_row(self) -> Row {
        let Transaction(timestamp, user_addr, id) = self;
        vec![
            Field::Int(timestamp.0),
            Field::Text(user_addr.0),
            Field::Text(id.0),
        ]
    }
}

/// Endless stream of transactions where a small pool of "major" users
/// accounts for half of all rows.
pub struct BulkDataGenerator {
    rng: SmallRng,
    major_pool: Vec<UserAddr>,
}

impl BulkDataGenerator {
    const MAJOR_USERS: Ratio<u32> = Ratio::new_raw(1, 100);
    const MAJOR_TRANSACTIONS: Ratio<u32> = Ratio::new_raw(50, 100);

    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Deterministic generator for repeatable benchmark inputs.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        BulkDataGenerator {
            rng,
            major_pool: Vec::new(),
        }
    }

    fn random_ratio(&mut self, ratio: Ratio<u32>) -> bool {
        self.rng.random_ratio(*ratio.numer(), *ratio.denom())
    }

    fn peek_user_addr(&mut self) -> Cow<'_, UserAddr> {
        let mut user_addr = None;
        if self.random_ratio(Self::MAJOR_TRANSACTIONS) {
            let major_user = self.major_pool.choose(&mut self.rng);
            user_addr = major_user.map(Cow::Borrowed);
        }
        if let Some(user_addr) = user_addr {
            user_addr
        } else {
            let random_user = UserAddr::new_random(&mut self.rng);
            Cow::Owned(random_user)
        }
    }
}

impl Default for BulkDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for BulkDataGenerator {
    type Item = Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        if self.random_ratio(Self::MAJOR_USERS) {
            let major_user_addr = UserAddr::new_random(&mut self.rng);
            self.major_pool.push(major_user_addr);
        }
        let user_addr = self.peek_user_addr().into_owned();
        let timestamp = Timestamp::new_random(&mut self.rng);
        let id = TransactionId::new_random(&mut self.rng);
        Some(Transaction(timestamp, user_addr, id))
    }
}

struct Hexadecimal;

impl Distribution<u8> for Hexadecimal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        const HEX_DIGITS_CHARSET: &[u8; 16] = b"0123456789abcdef";

        let var = rng.next_u32() >> (32 - 4);
        HEX_DIGITS_CHARSET[var as usize]
    }
}

impl SampleString for Hexadecimal {
    fn append_string<R: Rng + ?Sized>(&self, rng: &mut R, string: &mut String, len: usize) {
        string.extend(self.sample_iter(rng).take(len).map(char::from));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generator_is_repeatable() {
        let first: Vec<_> = BulkDataGenerator::with_seed(7).take(32).collect();
        let second: Vec<_> = BulkDataGenerator::with_seed(7).take(32).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rows_have_numeric_key_and_fixed_width_text() {
        for transaction in BulkDataGenerator::with_seed(1).take(16) {
            let row = transaction.into_row();
            assert_eq!(row.len(), 3);
            assert!(matches!(row[0], Field::Int(ts) if (0..Timestamp::BOUNDARY).contains(&ts)));
            assert!(matches!(&row[1], Field::Text(addr) if addr.len() == UserAddr::ADDRESS_LENGTH));
            assert!(matches!(&row[2], Field::Text(id)
                if id.len() == TransactionId::ID_LENGTH
                    && id.bytes().all(|b| b.is_ascii_hexdigit())));
        }
    }
}
