pub mod catalog;
pub mod core;
pub mod gui;
pub mod session;

pub use crate::{
    catalog::{
        CatalogApi,
        Character,
        FavoriteCharacter,
        HttpCatalog,
    },
    core::{
        CatalogConfig,
        RickdexError,
    },
    session::{
        BrowsingSession,
        FavoriteAction,
    },
};
