//! Spot resolution: from an opaque spot identifier to a name and coordinates.

use crate::spots::error::SpotLookupError;
use crate::types::lat_lon::LatLon;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;

/// A surf spot as known to the spot directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    /// `None` when the directory has no (complete) coordinates for the spot.
    pub coordinate: Option<LatLon>,
}

impl Spot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: LatLon) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate: Some(coordinate),
        }
    }

    /// The coordinate, if present and valid.
    pub fn usable_coordinate(&self) -> Option<LatLon> {
        self.coordinate.filter(LatLon::is_usable)
    }
}

/// Resolves spot identifiers. `Ok(None)` means the spot does not exist.
pub trait SpotLocator: Send + Sync {
    fn locate(
        &self,
        spot_id: &str,
    ) -> impl Future<Output = Result<Option<Spot>, SpotLookupError>> + Send;
}

/// A fixed, in-memory spot directory.
///
/// ```
/// use surfcast::{LatLon, Spot, StaticSpotLocator};
///
/// let locator: StaticSpotLocator = [
///     Spot::new("1", "La Gravière", LatLon(43.664, -1.448)),
///     Spot::new("36", "La Torche", LatLon(47.842, -4.348)),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(locator.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSpotLocator {
    spots: HashMap<String, Spot>,
}

impl StaticSpotLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, spot: Spot) {
        self.spots.insert(spot.id.clone(), spot);
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn spots(&self) -> impl Iterator<Item = &Spot> {
        self.spots.values()
    }
}

impl FromIterator<Spot> for StaticSpotLocator {
    fn from_iter<I: IntoIterator<Item = Spot>>(iter: I) -> Self {
        let mut locator = Self::new();
        for spot in iter {
            locator.insert(spot);
        }
        locator
    }
}

impl SpotLocator for StaticSpotLocator {
    async fn locate(&self, spot_id: &str) -> Result<Option<Spot>, SpotLookupError> {
        Ok(self.spots.get(spot_id).cloned())
    }
}
