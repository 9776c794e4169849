//! Static weapon catalog.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponClass {
    Assault,
    Sniper,
    Pistol,
}

/// Immutable weapon definition shared by every instance of that weapon.
#[derive(Debug, PartialEq, Eq)]
pub struct WeaponArchetype {
    pub id: &'static str,
    pub name: &'static str,
    pub class: WeaponClass,
    pub damage: u32,
    /// Percent, 0-100.
    pub accuracy: u8,
    /// Percent, 0-100.
    pub range: u8,
    pub fire_rate: u32,
    /// Percent, 0-100. Scales the crosshair kick per shot.
    pub recoil: u8,
    pub capacity: u32,
    pub price: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown weapon id `{0}`")]
    UnknownWeapon(String),
}

pub static WEAPONS: [WeaponArchetype; 4] = [
    WeaponArchetype {
        id: "ak47",
        name: "AK-47",
        class: WeaponClass::Assault,
        damage: 95,
        accuracy: 73,
        range: 88,
        fire_rate: 75,
        recoil: 85,
        capacity: 30,
        price: 2700,
    },
    WeaponArchetype {
        id: "m4a4",
        name: "M4A4",
        class: WeaponClass::Assault,
        damage: 85,
        accuracy: 78,
        range: 90,
        fire_rate: 78,
        recoil: 65,
        capacity: 30,
        price: 3100,
    },
    WeaponArchetype {
        id: "awp",
        name: "AWP",
        class: WeaponClass::Sniper,
        damage: 100,
        accuracy: 95,
        range: 100,
        fire_rate: 30,
        recoil: 95,
        capacity: 10,
        price: 4750,
    },
    WeaponArchetype {
        id: "glock",
        name: "Glock-18",
        class: WeaponClass::Pistol,
        damage: 45,
        accuracy: 60,
        range: 55,
        fire_rate: 85,
        recoil: 40,
        capacity: 20,
        price: 400,
    },
];

/// Find an archetype by id.
pub fn lookup(id: &str) -> Result<&'static WeaponArchetype, CatalogError> {
    WEAPONS
        .iter()
        .find(|w| w.id == id)
        .ok_or_else(|| CatalogError::UnknownWeapon(id.to_string()))
}

/// Archetype by catalog position (0-based), as shown in the armoury.
pub fn by_slot(slot: usize) -> Option<&'static WeaponArchetype> {
    WEAPONS.get(slot)
}
