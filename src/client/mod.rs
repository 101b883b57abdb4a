mod http;
mod types;

pub use http::{
    GENERATE_PATH, GenerationClient, HEALTH_PATH, HttpGenerationClient, INDEX_PATH,
};
pub use types::{GenerationOptions, GenerationRequest, GenerationResponse, Length, Tone};
