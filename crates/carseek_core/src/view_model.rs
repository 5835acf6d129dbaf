/// Read-only projection of the coordinator state for hosts to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView<R> {
    /// The latest successful result, replaced wholesale on each fetch.
    pub data: Option<R>,
    pub is_loading: bool,
    /// Whether the in-flight or just-settled fetch was user-initiated.
    pub is_manual: bool,
    /// Human-readable message of the last failure, if any.
    pub error: Option<String>,
    pub is_first_load: bool,
}
