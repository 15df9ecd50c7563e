use serde::Deserialize;

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub text: String, // full combat log text
}

#[derive(Deserialize)]
pub struct UploadRequest {
    pub uploader_id: String, // discord id of the pilot uploading
    pub text: String,
}

#[derive(Deserialize)]
pub struct SessionsQuery {
    pub uploader_id: Option<String>,
    pub limit: Option<u32>,
}
