// Resume vs job-description analysis.
// Resolves inputs (uploads first, inline text second), builds the prompt, calls the provider.
// All completion calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod input;
pub mod models;
pub mod prompts;
