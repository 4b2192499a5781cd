use wasm_bindgen::JsValue;

/// Failures that can stop the behaviour layer from attaching.
///
/// Missing optional markup is not an error: components skip silently. Only a
/// missing browser environment or a rejected configuration ends up here.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("JS call failed: {0}")]
    Js(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("phrase list has no non-empty phrase")]
    EmptyPhraseList,
}

impl From<JsValue> for PortfolioError {
    fn from(value: JsValue) -> Self {
        PortfolioError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PortfolioError> for JsValue {
    fn from(err: PortfolioError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
