//! Answer synthesis and critique
//!
//! Two thin layers over the generation model: [`AnswerSynthesizer`] turns
//! query + evidence into an answer, [`Critic`] reviews that answer and emits
//! a free-text verdict. [`route`] is the sole gate of the feedback loop: a
//! verdict containing `"inaccurate"` (case-insensitive) sends the run back
//! to retrieval, anything else publishes. The substring test is fragile -
//! a verdict like "nothing inaccurate here" would loop - but the model is
//! instructed to answer with exactly one word, and a structured verdict
//! schema would be the fix if that instruction stops holding.

use crate::error::Result;
use delver_llm::GenerativeModel;
use std::sync::Arc;

/// Where the critique verdict sends the run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Evidence was insufficient; retrieve again
    Retry,
    /// The answer stands; publish it
    Publish,
}

impl Route {
    /// The branch label used in the graph's conditional edge.
    pub fn as_label(&self) -> &'static str {
        match self {
            Route::Retry => "retry",
            Route::Publish => "publish",
        }
    }
}

/// Map a critique verdict to a route.
pub fn route(verdict: &str) -> Route {
    if verdict.to_lowercase().contains("inaccurate") {
        Route::Retry
    } else {
        Route::Publish
    }
}

/// Produces an answer grounded in retrieved evidence.
#[derive(Clone)]
pub struct AnswerSynthesizer {
    model: Arc<dyn GenerativeModel>,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generate an answer to `query` using only `context`.
    pub async fn synthesize(&self, query: &str, context: &str) -> Result<String> {
        let prompt = format!(
            "Answer the prompt based on the context.\nContext:\n{context}\n\nPrompt: {query}"
        );
        Ok(self.model.generate(&prompt).await?)
    }
}

/// Reviews a synthesized answer against its query and evidence.
#[derive(Clone)]
pub struct Critic {
    model: Arc<dyn GenerativeModel>,
}

impl Critic {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Produce a verdict on `response`. The model is asked to answer `ok`
    /// or `inaccurate`; the raw text is returned for [`route`] to inspect.
    pub async fn critique(&self, query: &str, context: &str, response: &str) -> Result<String> {
        let prompt = format!(
            "You are a helpful assistant tasked with reviewing and improving an AI-generated response.\n\
             Here is the original query:\n\
             {query}\n\
             \n\
             Here is the context provided for answering:\n\
             {context}\n\
             \n\
             And here is the response to review:\n\
             {response}\n\
             \n\
             Please check the response for accuracy, clarity, and completeness. \
             If the original response is already excellent, return the word ok.\n\
             Otherwise, return the word inaccurate."
        );
        Ok(self.model.generate(&prompt).await?)
    }
}
