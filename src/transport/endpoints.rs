//! Endpoint paths for the Vertex AI prediction service.

/// Publisher of the first-party generative models.
pub const PUBLISHER: &str = "google";

/// Returns the regional service root, e.g. `https://us-central1-aiplatform.googleapis.com`.
pub fn default_endpoint(location: &str) -> String {
    format!("https://{}-aiplatform.googleapis.com", location)
}

/// Full resource name of a publisher model.
///
/// ```
/// use integrations_vertexai::transport::endpoints;
///
/// let name = endpoints::model_resource("my-project", "us-central1", "gemini-pro");
/// assert_eq!(
///     name,
///     "projects/my-project/locations/us-central1/publishers/google/models/gemini-pro"
/// );
/// ```
pub fn model_resource(project_id: &str, location: &str, model: &str) -> String {
    format!(
        "projects/{}/locations/{}/publishers/{}/models/{}",
        project_id, location, PUBLISHER, model
    )
}

/// Path of the server-streaming generation method for a model resource.
pub fn stream_generate_content(resource: &str) -> String {
    format!("{}:streamGenerateContent", resource)
}

/// Path of the token counting method for a model resource.
pub fn count_tokens(resource: &str) -> String {
    format!("{}:countTokens", resource)
}
