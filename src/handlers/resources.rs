//! Handlers shared by every table-backed resource.
//!
//! Each handler is generic over an [`Entity`] and instantiated per route in
//! [`super::routes`].

use actix_web::{web, HttpResponse};

use super::form::{FormPayload, UploadedImage};
use super::{blocking, Envelope};
use crate::domain::entity::ImageSlot;
use crate::domain::ports::Repository;
use crate::errors::AppError;
use crate::infrastructure::{DieselRepository, ImageStore};
use crate::models::{Entity, FromFields, RecordKey};

type KeyPath<E> = web::Path<<<E as Entity>::Key as RecordKey>::Path>;

fn not_found<E: Entity>() -> AppError {
    AppError::NotFound(E::descriptor().label.to_string())
}

// ── Images ───────────────────────────────────────────────────────────────────

/// Persists an upload when the entity has an image slot. Entities without
/// one silently drop the file.
pub(crate) async fn store_image(
    images: &web::Data<ImageStore>,
    slot: Option<ImageSlot>,
    upload: Option<UploadedImage>,
) -> Result<Option<String>, AppError> {
    let (Some(slot), Some(upload)) = (slot, upload) else {
        return Ok(None);
    };
    let images = images.clone();
    blocking(move || images.save(slot, &upload.file_name, &upload.bytes))
        .await
        .map(Some)
}

/// Best-effort removal. Failures are logged and never reach the client.
pub(crate) async fn discard_image(images: &web::Data<ImageStore>, path: String) {
    let images = images.clone();
    let target = path.clone();
    match web::block(move || images.remove(&target)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("Failed to remove image {path}: {e}"),
        Err(e) => log::warn!("Failed to remove image {path}: {e}"),
    }
}

/// Stored path of the image an upload is about to replace. Looked up only
/// when a file came in, before it is written.
pub(crate) async fn previous_image<E: Entity>(
    repo: &web::Data<DieselRepository>,
    key: &E::Key,
    upload: &Option<UploadedImage>,
) -> Result<Option<String>, AppError> {
    if upload.is_none() || E::descriptor().image.is_none() {
        return Ok(None);
    }
    let repo = repo.clone();
    let key = key.clone();
    blocking(move || repo.stored_image::<E>(&key)).await
}

/// Removes whichever file lost: the new upload when the update did not
/// apply, otherwise the image it replaced.
pub(crate) async fn settle_images(
    images: &web::Data<ImageStore>,
    applied: bool,
    stored: Option<String>,
    previous: Option<String>,
) {
    let Some(stored) = stored else {
        return;
    };
    if !applied {
        discard_image(images, stored).await;
    } else if let Some(previous) = previous.filter(|previous| *previous != stored) {
        discard_image(images, previous).await;
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn list<E: Entity>(repo: web::Data<DieselRepository>) -> Result<HttpResponse, AppError> {
    let records = blocking(move || repo.list::<E>()).await?;
    Ok(HttpResponse::Ok().json(Envelope::new(records)))
}

pub async fn show<E: Entity>(
    repo: web::Data<DieselRepository>,
    path: KeyPath<E>,
) -> Result<HttpResponse, AppError> {
    let key = E::Key::from_path(path.into_inner())?;

    let record = blocking(move || repo.find::<E>(&key))
        .await?
        .ok_or_else(not_found::<E>)?;

    Ok(HttpResponse::Ok().json(Envelope::new(record)))
}

pub async fn create<E>(
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    form: FormPayload,
) -> Result<HttpResponse, AppError>
where
    E: Entity,
    E::New: FromFields,
{
    let (mut new, upload) = form.into_form::<E::New>()?;

    let stored = store_image(&images, E::descriptor().image, upload).await?;
    if let Some(path) = &stored {
        new.attach_image(path.clone());
    }

    let result = blocking(move || repo.create::<E>(new)).await;
    if let (Err(_), Some(path)) = (&result, stored) {
        discard_image(&images, path).await;
    }

    Ok(HttpResponse::Created().json(Envelope::new(result?)))
}

pub async fn update<E>(
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    path: KeyPath<E>,
    form: FormPayload,
) -> Result<HttpResponse, AppError>
where
    E: Entity,
    E::Changes: FromFields,
{
    let key = E::Key::from_path(path.into_inner())?;
    let (mut changes, upload) = form.into_form::<E::Changes>()?;

    let previous = previous_image::<E>(&repo, &key, &upload).await?;
    let stored = store_image(&images, E::descriptor().image, upload).await?;
    if let Some(path) = &stored {
        changes.attach_image(path.clone());
    }

    let result = blocking(move || repo.update::<E>(&key, changes)).await;
    settle_images(&images, matches!(result, Ok(Some(_))), stored, previous).await;

    let record = result?.ok_or_else(not_found::<E>)?;
    Ok(HttpResponse::Ok().json(Envelope::new(record)))
}

pub async fn delete<E: Entity>(
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    path: KeyPath<E>,
) -> Result<HttpResponse, AppError> {
    let key = E::Key::from_path(path.into_inner())?;

    let removed = blocking(move || repo.delete::<E>(&key))
        .await?
        .ok_or_else(not_found::<E>)?;
    if let Some(image) = removed.image {
        discard_image(&images, image).await;
    }

    Ok(HttpResponse::Ok().json(Envelope::new(format!(
        "{} deleted",
        E::descriptor().label
    ))))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    const VENDORS: ImageSlot = ImageSlot { directory: "vendors" };

    fn images() -> web::Data<ImageStore> {
        web::Data::new(ImageStore::new(
            std::env::temp_dir().join(format!("settle-{}", Uuid::new_v4())),
        ))
    }

    #[actix_web::test]
    async fn applied_update_removes_the_replaced_image() {
        let images = images();
        let old = images.save(VENDORS, "old.png", b"old").unwrap();
        let new = images.save(VENDORS, "new.png", b"new").unwrap();

        settle_images(&images, true, Some(new.clone()), Some(old.clone())).await;

        assert!(!images.root().join(&old).exists());
        assert!(images.root().join(&new).exists());
    }

    #[actix_web::test]
    async fn failed_update_removes_the_new_upload_only() {
        let images = images();
        let old = images.save(VENDORS, "old.png", b"old").unwrap();
        let new = images.save(VENDORS, "new.png", b"new").unwrap();

        settle_images(&images, false, Some(new.clone()), Some(old.clone())).await;

        assert!(images.root().join(&old).exists());
        assert!(!images.root().join(&new).exists());
    }

    #[actix_web::test]
    async fn update_without_upload_keeps_the_stored_image() {
        let images = images();
        let old = images.save(VENDORS, "old.png", b"old").unwrap();

        settle_images(&images, true, None, Some(old.clone())).await;

        assert!(images.root().join(&old).exists());
    }
}
