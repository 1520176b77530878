mod collection;
mod errors;

pub use collection::{
    duplicate_filter, ensure_indexes_exist, id_filter, insert_application, load_application,
    save_application, Coll, MongoCollection,
};
pub use errors::{is_duplicate_key_error, DUPLICATE_KEY};
