use std::fmt::{Formatter, Write};

pub mod account;
pub mod donation;
pub mod food;
pub mod issue;
pub mod opportunity;
pub mod resource;
pub mod verification;

#[async_trait::async_trait]
pub trait Request {
    type Output;

    const URL_SUFFIX: &'static str;
    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn make_req(&self, req: reqwest::RequestBuilder) -> anyhow::Result<reqwest::RequestBuilder>;

    async fn parse_res(&mut self, response: reqwest::Response) -> anyhow::Result<Self::Output>;
}

/// An unsuccessful response from the server.
#[derive(Debug)]
pub struct ResponseError {
    pub status_code: reqwest::StatusCode,
    pub error: Option<String>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_code.as_str())?;

        if let Some(msg) = self.status_code.canonical_reason() {
            f.write_char(' ')?;
            f.write_str(msg)?;
        }

        if let Some(ref msg) = self.error {
            f.write_str(": ")?;
            f.write_str(msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ResponseError {}

/// Calls a [`Request`] and return its output.
///
/// The credentials of the context are sent along if there are any.
pub async fn call<T: Request>(
    mut req: T,
    cx: &crate::Context,
) -> anyhow::Result<<T as Request>::Output> {
    let mut builder = cx
        .req_client
        .request(T::METHOD, format!("{}{}", cx.url_prefix, T::URL_SUFFIX));
    if let Some(credentials) = cx.credentials() {
        builder = builder.headers(credentials.headers()?);
    }
    let response = req.make_req(builder)?.send().await?;
    let status = response.status();

    if !status.is_success() {
        #[derive(serde::Deserialize)]
        struct ThrownError {
            error: String,
        }

        let err_msg = response
            .json::<ThrownError>()
            .await
            .ok()
            .map(|msg| msg.error);

        return Err(anyhow::Error::new(ResponseError {
            status_code: status,
            error: err_msg,
        }));
    }

    req.parse_res(response).await
}

/// Parses a JSON body, where an empty body stands for `null`.
pub(crate) async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> anyhow::Result<T> {
    let bytes = response.bytes().await?;
    Ok(if bytes.is_empty() {
        serde_json::from_str("null")?
    } else {
        serde_json::from_slice(&bytes)?
    })
}

/// Declares requests posting a descriptor as their JSON body.
macro_rules! json_requests {
    ($($(#[$m:meta])* $t:ident($d:ty) => $url:literal: $out:ty),* $(,)?) => {
        $(
            $(#[$m])*
            #[derive(Debug)]
            pub struct $t(pub $d);

            #[async_trait::async_trait]
            impl $crate::raw::Request for $t {
                type Output = $out;
                const URL_SUFFIX: &'static str = $url;

                fn make_req(
                    &self,
                    req: reqwest::RequestBuilder,
                ) -> anyhow::Result<reqwest::RequestBuilder> {
                    Ok(req.json(&self.0))
                }

                async fn parse_res(
                    &mut self,
                    response: reqwest::Response,
                ) -> anyhow::Result<Self::Output> {
                    $crate::raw::parse_json(response).await
                }
            }
        )*
    };
}

/// Declares requests without a body.
macro_rules! empty_requests {
    ($($(#[$m:meta])* $t:ident => $url:literal: $out:ty),* $(,)?) => {
        $(
            $(#[$m])*
            #[derive(Debug, Clone, Copy)]
            pub struct $t;

            #[async_trait::async_trait]
            impl $crate::raw::Request for $t {
                type Output = $out;
                const URL_SUFFIX: &'static str = $url;

                fn make_req(
                    &self,
                    req: reqwest::RequestBuilder,
                ) -> anyhow::Result<reqwest::RequestBuilder> {
                    Ok(req)
                }

                async fn parse_res(
                    &mut self,
                    response: reqwest::Response,
                ) -> anyhow::Result<Self::Output> {
                    $crate::raw::parse_json(response).await
                }
            }
        )*
    };
}

pub(crate) use empty_requests;
pub(crate) use json_requests;
