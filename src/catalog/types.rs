use serde::{
    Deserialize,
    Serialize,
};

/// One character record as the catalog serves it. Identity is `id`; the
/// remote assigns it and it never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub image: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
}

/// Envelope around every listing response. Anything besides `results` is
/// ignored; a response without `results` fails to decode.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageEnvelope {
    pub results: Vec<Character>,
}

/// A character as it sits in the browsing list, carrying the list-scoped
/// favorite flag. Distinct from membership in the global favorites set.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteCharacter {
    pub character: Character,
    pub is_favorite: bool,
}

impl FavoriteCharacter {
    pub fn new(character: Character) -> Self {
        Self { character, is_favorite: false }
    }

    pub fn id(&self) -> u32 {
        self.character.id
    }
}
