use std::sync::OnceLock;

use crate::model::status::{Catalog, Checkbox, StatusBits};

use super::ApplicationCore;

/// Which mask a flag accessor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusField {
    Desired,
    Previous,
}

/// A named boolean view of one role bit, such as `can_be_observer` or `was_psg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagAccessor {
    pub name: String,
    pub field: StatusField,
    pub bit: StatusBits,
}

impl FlagAccessor {
    pub fn get(&self, app: &ApplicationCore) -> bool {
        match self.field {
            StatusField::Desired => app.can_be(self.bit),
            StatusField::Previous => app.was(self.bit),
        }
    }

    pub fn set(&self, app: &mut ApplicationCore, value: Checkbox) {
        match self.field {
            StatusField::Desired => app.desired_statuses.set(self.bit, value),
            StatusField::Previous => app.previous_statuses.set(self.bit, value),
        }
    }
}

/// The accessor table, generated once from the role catalogs: `can_be_*`
/// for every future role including archived ones, `was_*` for past roles.
pub fn flag_accessors() -> &'static [FlagAccessor] {
    static ACCESSORS: OnceLock<Vec<FlagAccessor>> = OnceLock::new();
    ACCESSORS.get_or_init(|| {
        let desired = Catalog::FutureWithArchived
            .entries()
            .iter()
            .map(|e| FlagAccessor {
                name: format!("can_be_{}", e.name),
                field: StatusField::Desired,
                bit: e.bit,
            });
        let previous = Catalog::Past.entries().iter().map(|e| FlagAccessor {
            name: format!("was_{}", e.name),
            field: StatusField::Previous,
            bit: e.bit,
        });
        desired.chain(previous).collect()
    })
}

pub fn find_accessor(name: &str) -> Option<&'static FlagAccessor> {
    flag_accessors().iter().find(|accessor| accessor.name == name)
}
