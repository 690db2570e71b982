const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random alphanumeric slug of the given length
pub fn generate_slug(length: usize) -> String {
    std::iter::repeat_with(|| CHARSET[rand::random_range(0..CHARSET.len())] as char)
        .take(length)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_length_and_charset() {
        for length in [1, 6, 12] {
            let slug = generate_slug(length);
            assert_eq!(slug.len(), length);
            assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_generate_slug_varies() {
        let slugs: std::collections::HashSet<String> = (0..50).map(|_| generate_slug(8)).collect();
        assert!(slugs.len() > 1);
    }
}
