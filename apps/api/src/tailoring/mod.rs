// Resume tailoring: prompt construction, the generative call, validation of
// the reply, and the pipeline that drives a request through render and publish.
// All model calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;
