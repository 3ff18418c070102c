//! Player identity and per-colour data storage.
//!
//! ## Player
//!
//! Opaque `{id, name}` pair supplied by the authentication collaborator.
//! Two players are the same player when their ids match; the display name
//! is carried along but never compared.
//!
//! ## ColorMap
//!
//! Fixed two-slot storage indexed by `Color`, used for seats, cached move
//! lists and attack maps.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use super::piece::Color;

/// A participant, identified by `id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    /// Create a new player.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Per-colour data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use hex_duel::core::{Color, ColorMap};
///
/// let mut counts: ColorMap<u32> = ColorMap::new(|_| 0);
/// counts[Color::Black] += 2;
///
/// assert_eq!(counts[Color::White], 0);
/// assert_eq!(counts[Color::Black], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: [factory(Color::White), factory(Color::Black)],
        }
    }

    /// Create a map from explicit white and black values.
    pub fn from_pair(white: T, black: T) -> Self {
        Self {
            data: [white, black],
        }
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over `(Color, &T)` pairs, white first.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::BOTH.into_iter().zip(self.data.iter())
    }

    /// Transform every value.
    pub fn map<U>(self, f: impl Fn(Color, T) -> U) -> ColorMap<U> {
        let [white, black] = self.data;
        ColorMap {
            data: [f(Color::White, white), f(Color::Black, black)],
        }
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_equality_by_id() {
        let a = Player::new("u1", "Alice");
        let renamed = Player::new("u1", "Alice B.");
        let other = Player::new("u2", "Alice");

        assert_eq!(a, renamed);
        assert_ne!(a, other);
        assert_eq!(format!("{}", a), "Alice (u1)");
    }

    #[test]
    fn test_player_hash_by_id() {
        use rustc_hash::FxHashSet;

        let mut set = FxHashSet::default();
        set.insert(Player::new("u1", "Alice"));
        set.insert(Player::new("u1", "Someone else"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_color_map_new() {
        let map: ColorMap<u8> = ColorMap::new(|c| c.to_wire());
        assert_eq!(map[Color::White], 1);
        assert_eq!(map[Color::Black], 0);
    }

    #[test]
    fn test_color_map_mutation() {
        let mut map: ColorMap<Option<Player>> = ColorMap::with_default();
        assert!(map[Color::White].is_none());

        map[Color::White] = Some(Player::new("u1", "Alice"));
        assert_eq!(map[Color::White].as_ref().map(|p| p.id.as_str()), Some("u1"));
        assert!(map[Color::Black].is_none());
    }

    #[test]
    fn test_color_map_iter_and_map() {
        let map = ColorMap::from_pair(3, 4);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Color::White, &3), (Color::Black, &4)]);

        let doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled, ColorMap::from_pair(6, 8));
    }

    #[test]
    fn test_color_map_serialization() {
        let map = ColorMap::from_pair(Some(Player::new("u1", "A")), None);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: ColorMap<Option<Player>> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
