pub type EffectResult<T> = Result<T, EffectError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("dom operation failed: {0}")]
    Dom(String),

    #[error("browser window or document unavailable")]
    NoWindow,
}

impl EffectError {
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }
}
