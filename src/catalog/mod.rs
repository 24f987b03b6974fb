pub mod api;
pub mod types;

pub use api::{
    CatalogApi,
    HttpCatalog,
};
pub use types::{
    Character,
    FavoriteCharacter,
    Location,
    PageEnvelope,
};
