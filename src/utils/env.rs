/// Get environment variable with MOORING_ prefix, falling back to unprefixed version
///
/// This helper checks for `MOORING_{key}` first, then falls back to `{key}`
/// for compatibility with standard environment variable naming.
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("MOORING_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
