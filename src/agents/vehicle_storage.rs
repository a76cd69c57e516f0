use indexmap::IndexMap;
use std::ops::{Deref, DerefMut};

use crate::agents::vehicle::{VehicleId, VehicleState};

/// Storage for every vehicle (AI and player) tracked by the simulation.
///
/// Wraps an internal `IndexMap<VehicleId, VehicleState>` but hides the
/// concrete map type from callers, so internals can evolve without breaking
/// public APIs. Implements `Deref`/`DerefMut` to the underlying map so it
/// can be passed anywhere an `&IndexMap<VehicleId, VehicleState>` /
/// `&mut ...` is expected.
#[derive(Debug, Default)]
pub struct VehicleStorage(IndexMap<VehicleId, VehicleState>);

impl VehicleStorage {
    /// Create empty vehicle storage.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a vehicle by its id (`vehicle.id()` is used as the key).
    pub fn insert_vehicle(&mut self, vehicle: VehicleState) {
        self.0.insert(vehicle.id(), vehicle);
    }

    /// Removes a vehicle by id, returning it if it was present.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<VehicleState> {
        self.0.shift_remove(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, VehicleId, VehicleState> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, VehicleId, VehicleState> {
        self.0.iter_mut()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, VehicleId, VehicleState> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, VehicleId, VehicleState> {
        self.0.values_mut()
    }
}

impl Deref for VehicleStorage {
    type Target = IndexMap<VehicleId, VehicleState>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for VehicleStorage {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a VehicleStorage {
    type Item = (&'a VehicleId, &'a VehicleState);
    type IntoIter = indexmap::map::Iter<'a, VehicleId, VehicleState>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut VehicleStorage {
    type Item = (&'a VehicleId, &'a mut VehicleState);
    type IntoIter = indexmap::map::IterMut<'a, VehicleId, VehicleState>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::driver_params::DriverDefaults;
    use crate::agents::personality::DriverPersonality;
    use crate::agents::vehicle_kind::VehicleKind;
    use crate::agents::driver_params::DriverParams;

    #[test]
    fn insert_and_remove_round_trip() {
        let mut storage = VehicleStorage::new();
        let params = DriverParams::derive(VehicleKind::Car, DriverPersonality::Normal, &DriverDefaults::default());
        storage.insert_vehicle(VehicleState::new(1, VehicleKind::Car, params).build());
        assert_eq!(storage.len(), 1);
        let removed = storage.remove_vehicle(1);
        assert!(removed.is_some());
        assert!(storage.is_empty());
    }
}
