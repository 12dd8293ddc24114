//! Breadcrumb paths over the location hierarchy.

use serde::{Deserialize, Serialize};

use stockroom_core::{
    AreaId, DomainError, DomainResult, LocationId, SubAreaId, SubLocationId, ValueObject,
};

use crate::location::{Area, HierarchyNode, Location, SubArea, SubLocation};

/// Separator between breadcrumb segments.
pub const SEPARATOR: &str = " > ";

/// Read access to hierarchy nodes by id.
pub trait HierarchyLookup {
    fn location(&self, id: LocationId) -> Option<&Location>;
    fn sub_location(&self, id: SubLocationId) -> Option<&SubLocation>;
    fn area(&self, id: AreaId) -> Option<&Area>;
    fn sub_area(&self, id: SubAreaId) -> Option<&SubArea>;
}

/// Full ancestor chain of a sub area, root first.
///
/// Displays as `"<Location> > <SubLocation> > <Area> > <SubArea>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationPath {
    location_id: LocationId,
    location: String,
    sub_location: String,
    area: String,
    sub_area: String,
}

impl LocationPath {
    /// Walk SubArea -> Area -> SubLocation -> Location.
    ///
    /// A missing link means the store's integrity rules were bypassed; it is
    /// reported as `NotFound` naming the first missing node.
    pub fn resolve(lookup: &impl HierarchyLookup, sub_area_id: SubAreaId) -> DomainResult<Self> {
        let sub_area = lookup
            .sub_area(sub_area_id)
            .ok_or_else(|| DomainError::not_found("sub area", sub_area_id))?;
        let area = lookup
            .area(sub_area.area_id())
            .ok_or_else(|| DomainError::not_found("area", sub_area.area_id()))?;
        let sub_location = lookup
            .sub_location(area.sub_location_id())
            .ok_or_else(|| DomainError::not_found("sub location", area.sub_location_id()))?;
        let location = lookup
            .location(sub_location.location_id())
            .ok_or_else(|| DomainError::not_found("location", sub_location.location_id()))?;

        Ok(Self {
            location_id: location.id_typed(),
            location: location.name().to_string(),
            sub_location: sub_location.name().to_string(),
            area: area.name().to_string(),
            sub_area: sub_area.name().to_string(),
        })
    }

    /// Segments root first.
    pub fn segments(&self) -> [&str; 4] {
        [
            self.location.as_str(),
            self.sub_location.as_str(),
            self.area.as_str(),
            self.sub_area.as_str(),
        ]
    }

    /// Id of the root location the path starts at.
    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn root_name(&self) -> &str {
        &self.location
    }

    pub fn leaf_name(&self) -> &str {
        &self.sub_area
    }
}

impl ValueObject for LocationPath {}

impl core::fmt::Display for LocationPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.segments().join(SEPARATOR))
    }
}
