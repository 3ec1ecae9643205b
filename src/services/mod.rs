// Domain services - orchestration above the storage traits

pub mod film_service;
pub mod friendship_service;

pub use film_service::FilmService;
pub use friendship_service::FriendshipService;
