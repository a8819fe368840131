//! Content generation — prompt building, the request pipeline, and
//! validation of model output.

pub mod handlers;
pub mod pipeline;
pub mod platform;
pub mod prompts;
pub mod validate;
