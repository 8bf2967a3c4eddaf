/// Infers the type of a location from free text.
pub trait ClassifierGateway {
    /// Returns one of the given categories.
    fn classify(&self, name: &str, description: &str, categories: &[String])
        -> anyhow::Result<String>;
}
