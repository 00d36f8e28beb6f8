mod cart;
mod favorite;

pub use cart::{CartItem, CartLine, CartView, NewCartItem};
pub use favorite::{Favorite, NewFavorite};
