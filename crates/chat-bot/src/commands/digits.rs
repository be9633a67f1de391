//! Random digits - ten independent uniform digits.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use rand::Rng;
use telegram_client::InboundMessage;

/// Number of digits in every reply.
pub const DIGIT_COUNT: usize = 10;

pub struct DigitsHandler {
    prefix: Option<String>,
}

impl DigitsHandler {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Draw `DIGIT_COUNT` digits with replacement.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> String {
        (0..DIGIT_COUNT)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    fn reply(&self) -> String {
        let digits = Self::generate(&mut rand::thread_rng());
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, digits),
            None => digits,
        }
    }
}

impl Default for DigitsHandler {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl CommandHandler for DigitsHandler {
    fn name(&self) -> &str {
        "digits"
    }

    async fn execute(&self, _message: &InboundMessage) -> AppResult<String> {
        Ok(self.reply())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[tokio::test]
    async fn test_reply_is_ten_digits() {
        let handler = DigitsHandler::default();
        let message = InboundMessage::new(1, "anything at all");

        for _ in 0..100 {
            let reply = handler.execute(&message).await.unwrap();
            assert_eq!(reply.len(), DIGIT_COUNT);
            assert!(reply.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_prefix_is_prepended() {
        let handler = DigitsHandler::new(Some("Your number: ".into()));
        let reply = handler.execute(&InboundMessage::new(1, "x")).await.unwrap();

        let digits = reply.strip_prefix("Your number: ").unwrap();
        assert_eq!(digits.len(), DIGIT_COUNT);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_digits_uniform_per_position() {
        const TRIALS: usize = 20_000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [[0usize; 10]; DIGIT_COUNT];

        for _ in 0..TRIALS {
            for (position, c) in DigitsHandler::generate(&mut rng).bytes().enumerate() {
                counts[position][(c - b'0') as usize] += 1;
            }
        }

        // Expected 2000 per cell, sd ~42; allow about six sigma.
        for (position, row) in counts.iter().enumerate() {
            for (digit, &count) in row.iter().enumerate() {
                let freq = count as f64 / TRIALS as f64;
                assert!(
                    (freq - 0.1).abs() < 0.0125,
                    "digit {} at position {} has frequency {}",
                    digit,
                    position,
                    freq
                );
            }
        }
    }
}
