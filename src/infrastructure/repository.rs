use std::sync::Arc;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Nullable, Text};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::entity::{Descriptor, Projection, IMAGE_COLUMN, UPDATED_AT_COLUMN};
use crate::domain::errors::DomainError;
use crate::domain::ports::{AccountStore, Removed, Repository};
use crate::models::user::{Credentials, NewUser, User, UserChanges};
use crate::models::{Entity, RecordKey};
use crate::query::{Delete, Insert, Select, SqlValue, Update};
use crate::schema::users;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => DomainError::InvalidInput(info.message().to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
                if is_data_exception(info.message()) =>
            {
                DomainError::InvalidInput(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// Server messages of the class 22 data exceptions a client value can cause.
/// diesel reports these as `Unknown` without their SQLSTATE.
const DATA_EXCEPTIONS: &[&str] = &[
    "numeric field overflow",
    "value too long for type",
    "value out of range",
    "integer out of range",
];

fn is_data_exception(message: &str) -> bool {
    DATA_EXCEPTIONS
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

#[derive(QueryableByName)]
struct StoredImage {
    #[diesel(sql_type = Nullable<Text>)]
    img: Option<String>,
}

/// Postgres-backed [`Repository`] driven by entity descriptors.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    /// Prefix prepended to stored image paths on read.
    public_base: Arc<str>,
}

impl DieselRepository {
    pub fn new(pool: DbPool, public_base: &str) -> Self {
        Self {
            pool,
            public_base: Arc::from(public_base.trim_end_matches('/')),
        }
    }
}

fn key_filter<K: RecordKey>(descriptor: &Descriptor, key: &K) -> Vec<(&'static str, SqlValue)> {
    descriptor.key.iter().copied().zip(key.values()).collect()
}

impl Repository for DieselRepository {
    fn list<E: Entity>(&self) -> Result<Vec<E>, DomainError> {
        let mut conn = self.pool.get()?;
        let descriptor = E::descriptor();

        let statement = Select::from(descriptor.table)
            .columns(descriptor.projection.iter().copied())
            .public_base(&self.public_base)
            .build();

        Ok(statement.into_query().load::<E>(&mut conn)?)
    }

    fn find<E: Entity>(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let mut conn = self.pool.get()?;
        let descriptor = E::descriptor();

        let mut select = Select::from(descriptor.table)
            .columns(descriptor.projection.iter().copied())
            .public_base(&self.public_base);
        for (column, value) in key_filter(descriptor, key) {
            select = select.where_eq(column, value);
        }

        Ok(select
            .build()
            .into_query()
            .get_result::<E>(&mut conn)
            .optional()?)
    }

    fn create<E: Entity>(&self, new: E::New) -> Result<E, DomainError> {
        let mut conn = self.pool.get()?;
        let descriptor = E::descriptor();

        let statement = Insert::into(descriptor.table)
            .values(E::insert_values(new))
            .returning(descriptor.projection.iter().copied())
            .public_base(&self.public_base)
            .build();

        Ok(statement.into_query().get_result::<E>(&mut conn)?)
    }

    fn update<E: Entity>(
        &self,
        key: &E::Key,
        changes: E::Changes,
    ) -> Result<Option<E>, DomainError> {
        let mut conn = self.pool.get()?;
        let descriptor = E::descriptor();
        let filter = key_filter(descriptor, key);

        // Load raw stored values so image paths are written back unrewritten.
        let mut select = Select::from(descriptor.table).columns(descriptor.stored_projection());
        for (column, value) in filter.iter().cloned() {
            select = select.where_eq(column, value);
        }
        let Some(mut current) = select
            .build()
            .into_query()
            .get_result::<E>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let hidden = E::hidden_assignments(&changes);
        current.apply(changes);

        let mut update = Update::table(descriptor.table);
        for (column, value) in current.assignments().into_iter().chain(hidden) {
            update = update.set(column, value);
        }
        if descriptor.tracks_updates {
            update = update.set_now(UPDATED_AT_COLUMN);
        }
        for (column, value) in filter {
            update = update.where_eq(column, value);
        }
        let statement = update
            .returning(descriptor.projection.iter().copied())
            .public_base(&self.public_base)
            .build();

        Ok(statement
            .into_query()
            .get_result::<E>(&mut conn)
            .optional()?)
    }

    fn delete<E: Entity>(&self, key: &E::Key) -> Result<Option<Removed>, DomainError> {
        let mut conn = self.pool.get()?;
        let descriptor = E::descriptor();

        let mut delete = Delete::from(descriptor.table);
        for (column, value) in key_filter(descriptor, key) {
            delete = delete.where_eq(column, value);
        }

        if descriptor.image.is_none() {
            let deleted = delete.build().into_query().execute(&mut conn)?;
            return Ok((deleted > 0).then(Removed::default));
        }

        let row = delete
            .returning([Projection::Column(IMAGE_COLUMN)])
            .build()
            .into_query()
            .get_result::<StoredImage>(&mut conn)
            .optional()?;

        Ok(row.map(|row| Removed {
            image: row.img.filter(|path| !path.is_empty()),
        }))
    }

    fn stored_image<E: Entity>(&self, key: &E::Key) -> Result<Option<String>, DomainError> {
        let descriptor = E::descriptor();
        if descriptor.image.is_none() {
            return Ok(None);
        }
        let mut conn = self.pool.get()?;

        let mut select =
            Select::from(descriptor.table).columns([Projection::Column(IMAGE_COLUMN)]);
        for (column, value) in key_filter(descriptor, key) {
            select = select.where_eq(column, value);
        }
        let row = select
            .build()
            .into_query()
            .get_result::<StoredImage>(&mut conn)
            .optional()?;

        Ok(row.and_then(|row| row.img).filter(|path| !path.is_empty()))
    }
}

impl AccountStore for DieselRepository {
    fn find_credentials(&self, email: &str) -> Result<Option<Credentials>, DomainError> {
        let mut conn = self.pool.get()?;

        Ok(users::table
            .filter(users::email.eq(email))
            .select(Credentials::as_select())
            .first(&mut conn)
            .optional()?)
    }

    fn insert_user(&self, new: NewUser) -> Result<User, DomainError> {
        self.create::<User>(new)
    }

    fn find_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.find::<User>(&id)
    }

    fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DomainError> {
        self.update::<User>(&id, changes)
    }
}
