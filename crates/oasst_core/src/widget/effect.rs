#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEffect {
    /// Collect the visible text of the host page.
    GatherPageText,
    /// POST `{prompt}` to the ask endpoint.
    RemoteAsk {
        prompt: String,
        /// Chunks beyond the first that did not fit into the prompt.
        dropped_chunks: usize,
    },
}
