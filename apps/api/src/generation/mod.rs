// Assessment generation: provider strategies, prompt template, canned samples,
// and the submit pipeline.
// All hosted-model calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod provider;
pub mod samples;
