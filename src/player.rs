//! Seats and partnerships.
//!
//! Per-player and per-team state is stored in fixed arrays ([`Seats`], [`Teams`])
//! indexed by the enums rather than in maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// The four seats, in playing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    West,
    South,
    East,
    North,
}

impl Player {
    pub const ALL: [Player; 4] = [Player::West, Player::South, Player::East, Player::North];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The player to the left, who acts next.
    pub const fn next(self) -> Player {
        match self {
            Player::West => Player::South,
            Player::South => Player::East,
            Player::East => Player::North,
            Player::North => Player::West,
        }
    }

    /// The player `steps` seats further in playing order.
    pub fn offset(self, steps: usize) -> Player {
        Player::ALL[(self.index() + steps) % 4]
    }

    pub const fn team(self) -> Team {
        Team::of(self)
    }

    pub const fn partner(self) -> Player {
        self.next().next()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Player::West => "west",
            Player::South => "south",
            Player::East => "east",
            Player::North => "north",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerParseError {
    #[error("invalid player: '{0}'")]
    Invalid(String),
}

impl FromStr for Player {
    type Err = PlayerParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "west" | "w" => Ok(Player::West),
            "south" | "s" => Ok(Player::South),
            "east" | "e" => Ok(Player::East),
            "north" | "n" => Ok(Player::North),
            _ => Err(PlayerParseError::Invalid(s.to_string())),
        }
    }
}

/// The two partnerships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    #[serde(rename = "east/west")]
    EastWest,
    #[serde(rename = "north/south")]
    NorthSouth,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::EastWest, Team::NorthSouth];

    pub const fn of(player: Player) -> Team {
        match player {
            Player::West | Player::East => Team::EastWest,
            Player::South | Player::North => Team::NorthSouth,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::EastWest => Team::NorthSouth,
            Team::NorthSouth => Team::EastWest,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Team::EastWest => "east/west",
            Team::NorthSouth => "north/south",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seats<T>([T; 4]);

impl<T> Seats<T> {
    pub const fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    pub fn from_fn(mut f: impl FnMut(Player) -> T) -> Self {
        Self([f(Player::West), f(Player::South), f(Player::East), f(Player::North)])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Seats<U> {
        Seats::from_fn(|p| f(&self[p]))
    }

    pub fn as_array(&self) -> &[T; 4] {
        &self.0
    }
}

impl<T> Index<Player> for Seats<T> {
    type Output = T;
    fn index(&self, player: Player) -> &T {
        &self.0[player.index()]
    }
}

impl<T> IndexMut<Player> for Seats<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        &mut self.0[player.index()]
    }
}

/// One value per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Teams<T>([T; 2]);

impl<T> Teams<T> {
    pub const fn new(east_west: T, north_south: T) -> Self {
        Self([east_west, north_south])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        Team::ALL.into_iter().zip(self.0.iter())
    }

    pub fn as_array(&self) -> &[T; 2] {
        &self.0
    }
}

impl<T> Index<Team> for Teams<T> {
    type Output = T;
    fn index(&self, team: Team) -> &T {
        &self.0[team.index()]
    }
}

impl<T> IndexMut<Team> for Teams<T> {
    fn index_mut(&mut self, team: Team) -> &mut T {
        &mut self.0[team.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_all_seats() {
        let mut p = Player::West;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(p);
            p = p.next();
        }
        assert_eq!(p, Player::West);
        assert_eq!(seen, Player::ALL.to_vec());
        assert_eq!(Player::North.offset(2), Player::South);
    }

    #[test]
    fn partners_share_a_team() {
        for p in Player::ALL {
            assert_eq!(p.team(), p.partner().team());
            assert_ne!(p.team(), p.next().team());
        }
        assert_eq!(Team::of(Player::West), Team::EastWest);
        assert_eq!(Team::of(Player::North), Team::NorthSouth);
    }

    #[test]
    fn seats_index_by_player() {
        let mut seats = Seats::from_fn(|p| p.index() * 10);
        seats[Player::East] += 1;
        assert_eq!(seats[Player::East], 21);
        assert_eq!(seats.iter().count(), 4);
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Player::North).unwrap(), "\"north\"");
        assert_eq!(serde_json::to_string(&Team::EastWest).unwrap(), "\"east/west\"");
        assert_eq!(Player::from_str("South").unwrap(), Player::South);
    }
}
