/// Token estimation for budget accounting.
pub trait ITokenizer: Send + Sync {
    fn count(&self, text: &str) -> usize;
}
