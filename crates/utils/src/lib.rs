use rand::Rng;

/// Creates a random alphanumeric secret of the given length
pub fn create_random_secret(secret_len: usize) -> String {
    let random_secret: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect();
    random_secret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_creates_random_secret() {
        let len = 16;
        assert_eq!(create_random_secret(len).len(), len);
        assert_ne!(create_random_secret(len), create_random_secret(len));
    }
}
