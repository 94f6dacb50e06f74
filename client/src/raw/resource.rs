use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, RequestBuilder, Response};
use samaj_shared::resource::UploadResult;

/// Uploads a PDF registration document.
#[derive(Debug, Clone)]
pub struct UploadDocument {
    pub bytes: Bytes,
}

#[async_trait::async_trait]
impl super::Request for UploadDocument {
    type Output = UploadResult;
    const URL_SUFFIX: &'static str = "/api/resource/upload-document";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req
            .header(CONTENT_TYPE, "application/pdf")
            .body(self.bytes.clone()))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        Ok(response.json().await?)
    }
}

/// Uploads an image, which is stored as PNG.
#[derive(Debug, Clone)]
pub struct UploadImage {
    pub bytes: Bytes,
}

#[async_trait::async_trait]
impl super::Request for UploadImage {
    type Output = UploadResult;
    const URL_SUFFIX: &'static str = "/api/resource/upload-image";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.body(self.bytes.clone()))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        Ok(response.json().await?)
    }
}
