use rand::Rng;
use sha2::{Digest, Sha256};

/// Genera un salt aleatorio de 32 caracteres hexadecimales
pub fn generar_salt() -> String {
    let mut rng = rand::thread_rng();
    let a: u64 = rng.gen();
    let b: u64 = rng.gen();
    format!("{:016x}{:016x}", a, b)
}

/// Hash de PIN con salt usando SHA-256, en formato hexadecimal
pub fn hash_pin(salt: &str, pin: &str) -> String {
    let input = format!("{}{}", salt, pin);
    let hash = Sha256::digest(input.as_bytes());
    format!("{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_estable() {
        assert_eq!(hash_pin("abc", "1234"), hash_pin("abc", "1234"));
        assert_ne!(hash_pin("abc", "1234"), hash_pin("xyz", "1234"));
        assert_ne!(hash_pin("abc", "1234"), hash_pin("abc", "4321"));
    }

    #[test]
    fn test_salt_longitud() {
        let salt = generar_salt();
        assert_eq!(salt.len(), 32);
        assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
