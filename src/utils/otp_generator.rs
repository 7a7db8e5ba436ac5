// utils/otp_generator.rs
use rand::Rng;

/// 4-digit start code, generated once per job at creation. The customer
/// reads it to the worker on arrival; it gates the work-started transition.
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    rng.random_range(1000..10000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_always_four_digits() {
        for _ in 0..1000 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 4);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
