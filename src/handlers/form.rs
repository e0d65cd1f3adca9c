//! Request body extraction for form-encoded and multipart submissions.
//!
//! Every write endpoint accepts either `application/x-www-form-urlencoded` or
//! `multipart/form-data`. Multipart requests may carry one image file in the
//! `img` field. Other file fields are ignored.

use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use futures::StreamExt;

use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::models::fields::FormFields;
use crate::models::FromFields;

/// Multipart field that carries the image file.
pub const IMAGE_FIELD: &str = "img";

const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const MAX_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: FormFields,
    pub image: Option<UploadedImage>,
}

impl FormPayload {
    /// Validates the text fields into `T`; the image is handed back untouched.
    pub fn into_form<T: FromFields>(self) -> Result<(T, Option<UploadedImage>), DomainError> {
        Ok((T::from_fields(&self.fields)?, self.image))
    }
}

impl FromRequest for FormPayload {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::new(req.headers(), payload.take());
            return Box::pin(read_multipart(multipart));
        }

        let body = Bytes::from_request(req, payload);
        Box::pin(async move {
            let bytes = body.await.map_err(|e| AppError::BadRequest(e.to_string()))?;
            parse_urlencoded(&bytes)
        })
    }
}

fn parse_urlencoded(bytes: &[u8]) -> Result<FormPayload, AppError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes)
        .map_err(|e| AppError::BadRequest(format!("Malformed form body: {e}")))?;
    Ok(FormPayload {
        fields: FormFields::from_pairs(pairs),
        image: None,
    })
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormPayload, AppError> {
    let mut form = FormPayload::default();

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let limit = if file_name.is_some() {
            MAX_IMAGE_BYTES
        } else {
            MAX_FIELD_BYTES
        };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::BadRequest(format!("{name} is too large")));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            // An empty file input still arrives with an empty file name.
            Some(file_name) if name == IMAGE_FIELD && !file_name.is_empty() => {
                form.image.get_or_insert(UploadedImage { file_name, bytes });
            }
            Some(_) => {}
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::BadRequest(format!("{name} is not valid UTF-8")))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::ContentType;
    use actix_web::test::TestRequest;

    use super::*;

    async fn extract(req: TestRequest) -> Result<FormPayload, AppError> {
        let (req, mut payload) = req.to_http_parts();
        FormPayload::from_request(&req, &mut payload).await
    }

    fn multipart_request(body: &str) -> TestRequest {
        TestRequest::post()
            .insert_header((CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY"))
            .set_payload(body.replace('\n', "\r\n"))
    }

    #[actix_web::test]
    async fn urlencoded_fields_are_read() {
        let req = TestRequest::post()
            .insert_header(ContentType::form_url_encoded())
            .set_payload("name=Pizza&price=9.99&img=");
        let form = extract(req).await.unwrap();

        assert_eq!(form.fields.text("name"), Some("Pizza"));
        assert_eq!(form.fields.text("price"), Some("9.99"));
        assert_eq!(form.fields.text("img"), None);
        assert!(form.image.is_none());
    }

    #[actix_web::test]
    async fn empty_body_is_an_empty_form() {
        let form = extract(TestRequest::put()).await.unwrap();
        assert_eq!(form.fields, FormFields::new());
    }

    #[actix_web::test]
    async fn multipart_separates_fields_and_image() {
        let body = "--XBOUNDARY
Content-Disposition: form-data; name=\"name\"

Pizza
--XBOUNDARY
Content-Disposition: form-data; name=\"img\"; filename=\"pizza.png\"
Content-Type: image/png

PNGDATA
--XBOUNDARY--
";
        let form = extract(multipart_request(body)).await.unwrap();

        assert_eq!(form.fields.text("name"), Some("Pizza"));
        let image = form.image.expect("image should be present");
        assert_eq!(image.file_name, "pizza.png");
        assert_eq!(image.bytes, b"PNGDATA");
    }

    #[actix_web::test]
    async fn empty_file_input_is_not_an_image() {
        let body = "--XBOUNDARY
Content-Disposition: form-data; name=\"img\"; filename=\"\"
Content-Type: application/octet-stream


--XBOUNDARY--
";
        let form = extract(multipart_request(body)).await.unwrap();
        assert!(form.image.is_none());
    }

    #[actix_web::test]
    async fn into_form_runs_validation() {
        let req = TestRequest::post()
            .insert_header(ContentType::form_url_encoded())
            .set_payload("name=Pizza");
        let form = extract(req).await.unwrap();

        let err = form
            .into_form::<crate::models::item::NewItem>()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("price, vendor_id are required".to_string())
        );
    }
}
