use rand::{distributions::Alphanumeric, Rng};

/// Length of generated operator api keys
pub const API_KEY_LEN: usize = 32;

/// Creates a random alphanumeric string of the given length
pub fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}

/// Creates a secret suitable for the `x-api-key` header of operator routes
pub fn create_api_key() -> String {
    create_random_secret(API_KEY_LEN)
}
