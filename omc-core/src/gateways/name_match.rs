/// Semantic matching of a query against known names.
pub trait NameMatchGateway {
    /// Returns at most `limit` of the given candidates, best match first.
    fn closest_names(
        &self,
        query: &str,
        candidates: &[String],
        limit: usize,
    ) -> anyhow::Result<Vec<String>>;
}
