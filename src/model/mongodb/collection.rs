use std::ops::Deref;

use mongodb::{
    bson::{doc, Document},
    error::Error as DbError,
    options::IndexOptions,
    sync::{Collection, Database},
    IndexModel,
};

use crate::{
    error::{Error, Result},
    model::{
        application::{Application, ApplicationId, NewApplication},
        lookup::{DuplicateScan, LookupError, LookupResult, ScanField},
        state::ApplicationState,
    },
};

use super::errors::is_duplicate_key_error;

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// The sync `Collection` only derives `Clone` for `T: Clone`, which a handle doesn't need.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone_with_type())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

const APPLICATIONS: &str = "applications";
impl MongoCollection for Application {
    const NAME: &'static str = APPLICATIONS;
}
impl MongoCollection for NewApplication {
    const NAME: &'static str = APPLICATIONS;
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub fn ensure_indexes_exist(db: &Database) -> std::result::Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // One application per phone in each state.
    let phone_index = IndexModel::builder()
        .keys(doc! {"phone": 1, "state": 1})
        .options(unique)
        .build();
    let email_index = IndexModel::builder().keys(doc! {"email": 1}).build();

    let applications = Coll::<Application>::from_db(db);
    applications.create_index(phone_index, None)?;
    applications.create_index(email_index, None)?;

    Ok(())
}

pub fn id_filter(id: ApplicationId) -> Document {
    doc! {"_id": id}
}

/// Filter matching other applications whose `field` equals `value`.
pub fn duplicate_filter(
    field: ScanField,
    value: &str,
    exclude: Option<ApplicationId>,
    state: Option<ApplicationState>,
) -> Document {
    let mut filter = Document::new();
    filter.insert(field.as_str(), value);
    if let Some(id) = exclude {
        filter.insert("_id", doc! {"$ne": id});
    }
    if let Some(state) = state {
        filter.insert("state", state);
    }
    filter
}

/// Store a new application. Fails with [`Error::Conflict`] if the ID is in
/// use or another application in the same state has the same phone.
pub fn insert_application(applications: &Coll<Application>, app: &Application) -> Result<()> {
    match applications.insert_one(app, None) {
        Ok(_) => {
            info!("Stored application {} ({})", app.id, app.state());
            Ok(())
        }
        Err(err) if is_duplicate_key_error(&err) => {
            warn!("Rejected duplicate application {}: {err}", app.id);
            Err(Error::Conflict(format!(
                "application {} clashes with an existing record",
                app.id
            )))
        }
        Err(err) => Err(err.into()),
    }
}

pub fn load_application(
    applications: &Coll<Application>,
    id: ApplicationId,
) -> Result<Option<Application>> {
    Ok(applications.find_one(id_filter(id), None)?)
}

/// Overwrite a stored application, e.g. after a state transition.
pub fn save_application(applications: &Coll<Application>, app: &Application) -> Result<()> {
    let result = applications
        .replace_one(id_filter(app.id), app, None)
        .map_err(|err| {
            if is_duplicate_key_error(&err) {
                Error::Conflict(format!("application {} clashes with an existing record", app.id))
            } else {
                err.into()
            }
        })?;
    if result.matched_count == 0 {
        return Err(Error::Conflict(format!("application {} is not stored", app.id)));
    }
    debug!("Saved application {} ({})", app.id, app.state());
    Ok(())
}

impl DuplicateScan for Coll<Application> {
    fn count_others(
        &self,
        field: ScanField,
        value: &str,
        exclude: Option<ApplicationId>,
        state: Option<ApplicationState>,
    ) -> LookupResult<u64> {
        self.count_documents(duplicate_filter(field, value, exclude, state), None)
            .map_err(|err| LookupError::Unavailable {
                service: Application::NAME,
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::Bson;

    use super::*;

    #[test]
    fn scan_any_state() {
        let filter = duplicate_filter(ScanField::Email, "a@b.c", None, None);
        assert_eq!(filter, doc! {"email": "a@b.c"});
    }

    #[test]
    fn scan_excludes_own_record_within_state() {
        let filter = duplicate_filter(
            ScanField::Phone,
            "9123456789",
            Some(3),
            Some(ApplicationState::Rejected),
        );
        assert_eq!(filter.get_str("phone").unwrap(), "9123456789");
        assert_eq!(filter.get_document("_id").unwrap(), &doc! {"$ne": 3_u32});
        assert_eq!(filter.get("state"), Some(&Bson::String("rejected".into())));
    }

    /// Compile-time check: handles clone without the document type being `Clone`.
    #[allow(dead_code)]
    fn clone_any_handle<T>(coll: &Coll<T>) -> Coll<T> {
        coll.clone()
    }

    #[test]
    fn id_filters() {
        assert_eq!(id_filter(7), doc! {"_id": 7_u32});
    }
}
