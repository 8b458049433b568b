use serde::{Deserialize, Serialize};

use stockroom_core::{DomainResult, Entity, LocationId, text};

/// Entity: Location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    id: LocationId,
    name: String,
    address: Option<String>,
}

/// Command: CreateLocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLocation {
    pub location_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Command: UpdateLocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLocation {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl Location {
    pub fn create(cmd: CreateLocation) -> DomainResult<Self> {
        let id = LocationId::new(&cmd.location_id)?;
        let name = text::required("name", &cmd.name)?;
        Ok(Self {
            id,
            name,
            address: text::optional(cmd.address),
        })
    }

    /// Rehydrate a location from storage.
    pub fn restore(id: LocationId, name: String, address: Option<String>) -> Self {
        Self { id, name, address }
    }

    pub fn update(&mut self, cmd: UpdateLocation) -> DomainResult<()> {
        self.name = text::required("name", &cmd.name)?;
        self.address = text::optional(cmd.address);
        Ok(())
    }

    pub fn id_typed(&self) -> &LocationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
