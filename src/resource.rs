//! Uploaded images and documents.

use std::{io::Cursor, path::PathBuf};

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use samaj_shared::Identity;
use serde::{Deserialize, Serialize};

use crate::{store, Error};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Resource {
    pub id: u64,
    pub variant: Variant,
    /// `None` for documents uploaded before registering.
    #[serde(default)]
    pub uploader: Option<Identity>,
    pub creation_time: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// A PNG image.
    Image,
    Pdf,
}

impl Variant {
    pub fn mime(self) -> mime::Mime {
        match self {
            Variant::Image => mime::IMAGE_PNG,
            Variant::Pdf => mime::APPLICATION_PDF,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Variant::Image => "png",
            Variant::Pdf => "pdf",
        }
    }
}

/// Storage of uploaded resources.
///
/// Resources are written to `<dir>/<id>.<ext>` and `<dir>/<id>.toml` and read
/// back from there on every request. They are only held in memory when no
/// directory is set.
pub struct Resources {
    entries: DashMap<u64, (Resource, Bytes)>,
    dir: Option<PathBuf>,
}

impl Resources {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self {
            entries: DashMap::new(),
            dir,
        }
    }

    /// Stores a PDF document.
    ///
    /// # Errors
    ///
    /// - Errors if the content type is not `application/pdf` or the bytes are not a PDF.
    /// - Errors if the document is larger than `max_bytes`.
    pub async fn upload_document(
        &self,
        bytes: Bytes,
        content_type: Option<&str>,
        uploader: Option<Identity>,
        max_bytes: usize,
    ) -> Result<Resource, Error> {
        if bytes.len() > max_bytes {
            return Err(Error::invalid(format!(
                "upload of {} bytes exceeds {max_bytes}",
                bytes.len()
            )));
        }
        let is_pdf = content_type
            .and_then(|t| t.parse::<mime::Mime>().ok())
            .map_or(false, |t| t.essence_str() == mime::APPLICATION_PDF.essence_str());
        if !is_pdf {
            return Err(Error::invalid("documents must be uploaded as application/pdf"));
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(Error::invalid("document is not a PDF file"));
        }
        self.insert(Variant::Pdf, uploader, bytes).await
    }

    /// Stores an image, re-encoded as PNG.
    pub async fn upload_image(
        &self,
        bytes: Bytes,
        uploader: Identity,
        max_bytes: usize,
    ) -> Result<Resource, Error> {
        if bytes.len() > max_bytes {
            return Err(Error::invalid(format!(
                "upload of {} bytes exceeds {max_bytes}",
                bytes.len()
            )));
        }
        let image = image::load_from_memory(&bytes)?;
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)?;
        self.insert(Variant::Image, Some(uploader), png.into()).await
    }

    async fn insert(
        &self,
        variant: Variant,
        uploader: Option<Identity>,
        bytes: Bytes,
    ) -> Result<Resource, Error> {
        let resource = Resource {
            id: store::new_id(),
            variant,
            uploader,
            creation_time: Utc::now(),
        };
        tracing::info!(
            "storing {:?} resource {} of {} bytes",
            variant,
            resource.id,
            bytes.len()
        );
        match self.dir {
            // Metadata goes last, a resource without it is never served.
            Some(ref dir) => {
                tokio::fs::create_dir_all(dir).await?;
                tokio::fs::write(
                    dir.join(format!("{}.{}", resource.id, variant.extension())),
                    &bytes,
                )
                .await?;
                tokio::fs::write(
                    dir.join(format!("{}.toml", resource.id)),
                    toml::to_string(&resource)?,
                )
                .await?;
            }
            None => {
                self.entries.insert(resource.id, (resource.clone(), bytes));
            }
        }
        Ok(resource)
    }

    pub async fn get(&self, id: u64) -> Result<(Resource, Bytes), Error> {
        let Some(ref dir) = self.dir else {
            return self
                .entries
                .get(&id)
                .map(|entry| entry.value().clone())
                .ok_or(Error::ResourceNotFound(id));
        };
        let meta = match tokio::fs::read_to_string(dir.join(format!("{id}.toml"))).await {
            Ok(s) => s,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ResourceNotFound(id))
            }
            Err(err) => return Err(err.into()),
        };
        let resource: Resource = toml::from_str(&meta)?;
        let bytes = Bytes::from(
            tokio::fs::read(dir.join(format!("{id}.{}", resource.variant.extension()))).await?,
        );
        Ok((resource, bytes))
    }
}

/// Public URL of a resource.
pub fn url(public_url: &str, id: u64) -> String {
    format!("{}/api/resource/{id}", public_url.trim_end_matches('/'))
}

pub mod handle {
    use axum::{
        body::Bytes,
        extract::{Path, State},
        http::{header, HeaderMap},
        response::IntoResponse,
        Json,
    };
    use samaj_shared::{guard::Guard, resource::UploadResult};

    use crate::{session::Session, store::Store, Error, Global};

    /// Uploads a registration document. A session is optional as
    /// organizations upload their documents before registering.
    pub async fn upload_document<S: Store>(
        session: Option<Session>,
        State(Global {
            resources, config, ..
        }): State<Global<S>>,
        headers: HeaderMap,
        bytes: Bytes,
    ) -> Result<Json<UploadResult>, Error> {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str())
            .transpose()?;
        let resource = resources
            .upload_document(
                bytes,
                content_type,
                session.map(|s| s.identity),
                config.upload.max_bytes,
            )
            .await?;
        Ok(Json(UploadResult {
            id: resource.id,
            url: super::url(&config.public_url, resource.id),
        }))
    }

    pub async fn upload_image<S: Store>(
        session: Session,
        State(Global {
            resources, config, ..
        }): State<Global<S>>,
        bytes: Bytes,
    ) -> Result<Json<UploadResult>, Error> {
        session.require(Guard::Authenticated)?;
        let resource = resources
            .upload_image(bytes, session.identity, config.upload.max_bytes)
            .await?;
        Ok(Json(UploadResult {
            id: resource.id,
            url: super::url(&config.public_url, resource.id),
        }))
    }

    pub async fn get<S: Store>(
        State(Global { resources, .. }): State<Global<S>>,
        Path(id): Path<u64>,
    ) -> Result<impl IntoResponse, Error> {
        let (resource, bytes) = resources.get(id).await?;
        Ok((
            [(header::CONTENT_TYPE, resource.variant.mime().to_string())],
            bytes,
        ))
    }
}
