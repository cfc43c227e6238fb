//! Business persistence

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::BizdeskResult;
use crate::models::{Business, BusinessId};

use super::catalog::NamedRecord;
use super::repository::{Record, Repository};

pub type BusinessRepository = Repository<Business>;

impl Record for Business {
    type Id = BusinessId;
    const ENTITY: EntityType = EntityType::Business;

    fn id(&self) -> BusinessId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}

impl NamedRecord for Business {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Repository<Business> {
    /// Resolve a business from a UUID (optionally `biz-` prefixed) or a name
    pub fn resolve(&self, identifier: &str) -> BizdeskResult<Option<Business>> {
        if let Ok(id) = identifier.parse::<BusinessId>() {
            if let Some(business) = self.get(id)? {
                return Ok(Some(business));
            }
        }
        self.get_by_name(identifier)
    }
}
